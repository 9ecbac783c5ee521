//! Shows which backend each call resolves to
//!
//! Run with `RUST_LOG=trace` to see the dispatch spans.

use dispatch_core::{
    select_system, seq, transform, transform_binary, transform_if_with, AnyTag, BackendTag,
    ExecutionPolicy, Sequential,
};
use dispatch_parallel::{par, DeviceStream, DeviceVec, HostPool, ParallelDevice, ParallelHost};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Resolution:");
    println!(
        "- (any, any)                  -> {}",
        select_system((AnyTag, AnyTag)).info()
    );
    println!(
        "- (sequential, any)           -> {}",
        select_system((Sequential, AnyTag)).info()
    );
    println!(
        "- (sequential, parallel-host) -> {}",
        select_system((Sequential, ParallelHost)).info()
    );
    println!(
        "- (parallel-device, any)      -> {}",
        select_system((ParallelDevice, AnyTag)).info()
    );

    let n = 1_000_000;
    let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let b: Vec<f64> = (0..n).map(|i| (n - i) as f64).collect();
    let mut out = vec![0.0; n];

    // Raw vectors: sequential
    transform(&a, &mut out, |x| x.sqrt())?;

    // One sequential and one parallel-host input: parallel-host
    transform_binary(seq(&a), par(&b), &mut out, |x, y| x + y)?;
    println!("\nsum[0] = {}, sum[n-1] = {}", out[0], out[n - 1]);

    // Device buffers on a configured stream
    let stream = DeviceStream::builder().workers(4).block_size(4096).build()?;
    let input = DeviceVec::upload(&a);
    let mut output = DeviceVec::filled(n, 0.0);
    transform_if_with(&stream, &input, &mut output, |x| x * 2.0, |x| *x >= 10.0)?;
    let host = output.into_host();
    println!(
        "device: {} workers, block size {}, out[9] = {}, out[10] = {}",
        stream.num_workers(),
        stream.block_size(),
        host[9],
        host[10]
    );

    let pool = HostPool::with_num_threads(2)?;
    println!(
        "host pool: {} threads on {}",
        pool.num_threads(),
        pool.backend_name()
    );
    println!("lineage of {}: {:?}", ParallelHost::NAME, ParallelHost::LINEAGE);

    Ok(())
}
