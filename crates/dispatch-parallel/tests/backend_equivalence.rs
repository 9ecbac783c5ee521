//! Every backend computes the same result for the same call
//!
//! The sequential backend is the reference; the host and device backends
//! are reached both through tagged cursors and through explicit policies.

mod common;

use common::{edge_case_lengths, generate_stencil, generate_test_data};
use dispatch_core::{
    seq, transform, transform_binary, transform_binary_if, transform_binary_if_with,
    transform_binary_with, transform_if, transform_if_stencil, transform_if_stencil_with,
    transform_if_with, transform_with, Error, Sequential,
};
use dispatch_parallel::{par, DeviceStream, DeviceVec, HostPool};
use proptest::prelude::*;

fn affine(x: &i64) -> i64 {
    x.wrapping_mul(3).wrapping_add(7)
}

fn mix(x: &i64, y: &i64) -> i64 {
    x.wrapping_sub(*y).wrapping_mul(2)
}

#[test]
fn test_transform_across_lengths() {
    for (seed, len) in edge_case_lengths().into_iter().enumerate() {
        let data = generate_test_data(seed as u64, len);

        let mut expected = vec![0; len];
        transform(seq(&data), &mut expected, affine).unwrap();

        let mut host = vec![0; len];
        transform(par(&data), &mut host, affine).unwrap();
        assert_eq!(host, expected, "host, len {len}");

        let input = DeviceVec::upload(&data);
        let mut device = DeviceVec::filled(len, 0);
        transform(&input, &mut device, affine).unwrap();
        assert_eq!(device.to_host(), expected, "device, len {len}");
    }
}

#[test]
fn test_binary_transform_across_lengths() {
    for (seed, len) in edge_case_lengths().into_iter().enumerate() {
        let a = generate_test_data(seed as u64, len);
        let b = generate_test_data(seed as u64 + 100, len);

        let mut expected = vec![0; len];
        transform_binary_with(Sequential, &a, &b, &mut expected, mix).unwrap();

        let mut host = vec![0; len];
        transform_binary(par(&a), &b, &mut host, mix).unwrap();
        assert_eq!(host, expected, "host, len {len}");

        let (da, db) = (DeviceVec::upload(&a), DeviceVec::upload(&b));
        let mut device = DeviceVec::filled(len, 0);
        transform_binary(&da, &db, &mut device, mix).unwrap();
        assert_eq!(device.to_host(), expected, "device, len {len}");
    }
}

#[test]
fn test_dedicated_pools_match_global() {
    let data = generate_test_data(7, 5000);
    let stencil = generate_stencil(8, 5000, 0.3);

    let mut global = vec![-1; 5000];
    transform_if_stencil(par(&data), &stencil, &mut global, affine, |s| *s).unwrap();

    let pool = HostPool::with_num_threads(3).unwrap();
    let mut pooled = vec![-1; 5000];
    transform_if_stencil_with(&pool, &data, &stencil, &mut pooled, affine, |s| *s).unwrap();
    assert_eq!(pooled, global);

    for block_size in [1, 3, 64, 256, 10_000] {
        let stream = DeviceStream::builder()
            .workers(2)
            .block_size(block_size)
            .build()
            .unwrap();
        let mut device = DeviceVec::filled(5000, -1);
        transform_if_stencil_with(
            &stream,
            &DeviceVec::upload(&data),
            &DeviceVec::upload(&stencil),
            &mut device,
            affine,
            |s| *s,
        )
        .unwrap();
        assert_eq!(device.into_host(), global, "block size {block_size}");
    }
}

#[test]
fn test_size_mismatch_is_reported_by_every_backend() {
    let data = generate_test_data(9, 100);
    let mut short = vec![0; 99];

    let errors = [
        transform_with(Sequential, &data, &mut short, affine).unwrap_err(),
        transform_with(HostPool::new(), &data, &mut short, affine).unwrap_err(),
        transform_with(DeviceStream::default(), &data, &mut short, affine).unwrap_err(),
    ];
    for err in errors {
        assert!(matches!(
            err,
            Error::SizeMismatch {
                operand: "output",
                expected: 100,
                actual: 99
            }
        ));
    }
    assert!(short.iter().all(|x| *x == 0));
}

proptest! {
    #[test]
    fn prop_transform_if_equivalent(
        data in prop::collection::vec(-1_000i64..1_000, 0..600),
        fill in any::<i64>(),
        threshold in -1_000i64..1_000,
    ) {
        let len = data.len();
        let pred = |x: &i64| *x > threshold;

        let mut expected = vec![fill; len];
        transform_if(seq(&data), &mut expected, affine, pred).unwrap();

        let mut host = vec![fill; len];
        transform_if_with(HostPool::new(), &data, &mut host, affine, pred).unwrap();
        prop_assert_eq!(&host, &expected);

        let mut device = DeviceVec::filled(len, fill);
        transform_if(&DeviceVec::upload(&data), &mut device, affine, pred).unwrap();
        prop_assert_eq!(device.into_host(), expected);
    }

    #[test]
    fn prop_binary_transform_if_equivalent(
        seed in any::<u64>(),
        len in 0usize..600,
        density in 0.0f64..1.0,
    ) {
        let a = generate_test_data(seed, len);
        let b = generate_test_data(seed ^ 0x5555, len);
        let stencil = generate_stencil(seed, len, density);

        let mut expected = vec![0; len];
        transform_binary_if(seq(&a), &b, &stencil, &mut expected, mix, |s| *s).unwrap();

        let mut host = vec![0; len];
        transform_binary_if(par(&a), par(&b), &stencil, &mut host, mix, |s| *s).unwrap();
        prop_assert_eq!(&host, &expected);

        let stream = DeviceStream::builder().block_size(5).build().unwrap();
        let mut device = DeviceVec::filled(len, 0);
        transform_binary_if_with(
            stream,
            &DeviceVec::upload(&a),
            &DeviceVec::upload(&b),
            &DeviceVec::upload(&stencil),
            &mut device,
            mix,
            |s| *s,
        )
        .unwrap();
        prop_assert_eq!(device.into_host(), expected);
    }
}
