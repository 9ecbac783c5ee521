//! Stream-based device backend
//!
//! [`ParallelDevice`] models an accelerator with its own memory: data lives
//! in [`DeviceVec`] buffers and work is launched block by block on a
//! [`DeviceStream`]. Each block is processed in order by one worker, and
//! blocks run concurrently.
//!
//! The device does not refine [`Sequential`](dispatch_core::Sequential), so
//! a call mixing host-tagged and device-tagged cursors has no backend:
//!
//! ```compile_fail
//! use dispatch_core::transform;
//! use dispatch_parallel::{par, DeviceVec};
//!
//! let host = vec![1, 2, 3];
//! let mut device = DeviceVec::filled(3, 0);
//! transform(par(&host), &mut device, |x| x + 1).unwrap();
//! ```

use dispatch_core::{
    backend_tag, ensure_len, execution_policy, BinaryTransform, BinaryTransformIf, Error,
    HasBackendTag, InputSequence, OutputSequence, Result, Transform, TransformIf,
    TransformIfStencil,
};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Elements per block when a stream is not configured otherwise
pub const DEFAULT_BLOCK_SIZE: usize = 256;

backend_tag! {
    /// Block-wise execution on a device stream
    pub struct ParallelDevice("parallel-device");
}

/// Device execution policy: a worker pool and a launch block size
#[derive(Clone, Debug)]
pub struct DeviceStream {
    workers: Option<Arc<rayon::ThreadPool>>,
    block_size: usize,
}

execution_policy!(DeviceStream => ParallelDevice);

impl Default for DeviceStream {
    fn default() -> Self {
        Self {
            workers: None,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl PartialEq for DeviceStream {
    fn eq(&self, other: &Self) -> bool {
        let same_workers = match (&self.workers, &other.workers) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_workers && self.block_size == other.block_size
    }
}

impl DeviceStream {
    pub fn builder() -> DeviceStreamBuilder {
        DeviceStreamBuilder::default()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of workers blocks are spread over
    pub fn num_workers(&self) -> usize {
        match &self.workers {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn launch<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.workers {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

/// Builder for [`DeviceStream`]
#[derive(Clone, Debug)]
pub struct DeviceStreamBuilder {
    workers: Option<usize>,
    block_size: usize,
}

impl Default for DeviceStreamBuilder {
    fn default() -> Self {
        Self {
            workers: None,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl DeviceStreamBuilder {
    /// Run on a dedicated pool of `n` workers instead of the global pool
    pub fn workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }

    pub fn block_size(mut self, n: usize) -> Self {
        self.block_size = n;
        self
    }

    pub fn build(self) -> Result<DeviceStream> {
        if self.block_size == 0 {
            return Err(Error::InvalidParameter(
                "block size must be positive".to_string(),
            ));
        }

        let workers = match self.workers {
            Some(0) => {
                return Err(Error::InvalidParameter(
                    "device stream needs at least one worker".to_string(),
                ))
            }
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("device-stream-{i}"))
                    .build()
                    .map_err(|e| Error::Execution(format!("Failed to create device stream: {e}")))?;
                Some(Arc::new(pool))
            }
            None => None,
        };

        debug!(
            workers = ?self.workers,
            block_size = self.block_size,
            "created device stream"
        );
        Ok(DeviceStream {
            workers,
            block_size: self.block_size,
        })
    }
}

/// A buffer resident on the device
///
/// Cursors over a `DeviceVec` resolve to [`ParallelDevice`]. Moving data
/// between host and device is always explicit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceVec<T> {
    data: Vec<T>,
}

impl<T> DeviceVec<T> {
    /// Copy a host slice to the device
    pub fn upload(host: &[T]) -> Self
    where
        T: Clone,
    {
        Self {
            data: host.to_vec(),
        }
    }

    /// Take ownership of a host vector without copying
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn filled(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: vec![value; len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy the buffer back to the host
    pub fn to_host(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }

    pub fn into_host(self) -> Vec<T> {
        self.data
    }
}

impl<T> HasBackendTag for DeviceVec<T> {
    type Tag = ParallelDevice;
}

impl<T> InputSequence for DeviceVec<T> {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> OutputSequence for DeviceVec<T> {
    type Item = T;

    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl Transform for DeviceStream {
    fn transform<I, O, F>(&self, input: I, mut output: O, op: F) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
    {
        let src = input.as_slice();
        let n = src.len();
        let dst = output.as_mut_slice();
        ensure_len("output", n, dst.len())?;
        let dst = &mut dst[..n];
        let block = self.block_size;

        self.launch(|| {
            dst.par_chunks_mut(block)
                .zip(src.par_chunks(block))
                .for_each(|(d, s)| {
                    for (out, x) in d.iter_mut().zip(s) {
                        *out = op(x);
                    }
                })
        });
        Ok(n)
    }
}

impl BinaryTransform for DeviceStream {
    fn transform_binary<I1, I2, O, F>(
        &self,
        input1: I1,
        input2: I2,
        mut output: O,
        op: F,
    ) -> Result<usize>
    where
        I1: InputSequence,
        I2: InputSequence,
        O: OutputSequence,
        I1::Item: Sync,
        I2::Item: Sync,
        O::Item: Send,
        F: Fn(&I1::Item, &I2::Item) -> O::Item + Sync + Send,
    {
        let a = input1.as_slice();
        let b = input2.as_slice();
        let n = a.len();
        let dst = output.as_mut_slice();
        ensure_len("second input", n, b.len())?;
        ensure_len("output", n, dst.len())?;
        let (b, dst) = (&b[..n], &mut dst[..n]);
        let block = self.block_size;

        self.launch(|| {
            dst.par_chunks_mut(block)
                .zip(a.par_chunks(block).zip(b.par_chunks(block)))
                .for_each(|(d, (xs, ys))| {
                    for (out, (x, y)) in d.iter_mut().zip(xs.iter().zip(ys)) {
                        *out = op(x, y);
                    }
                })
        });
        Ok(n)
    }
}

impl TransformIf for DeviceStream {
    fn transform_if<I, O, F, P>(&self, input: I, mut output: O, op: F, pred: P) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
        P: Fn(&I::Item) -> bool + Sync + Send,
    {
        let src = input.as_slice();
        let n = src.len();
        let dst = output.as_mut_slice();
        ensure_len("output", n, dst.len())?;
        let dst = &mut dst[..n];
        let block = self.block_size;

        self.launch(|| {
            dst.par_chunks_mut(block)
                .zip(src.par_chunks(block))
                .for_each(|(d, s)| {
                    for (out, x) in d.iter_mut().zip(s) {
                        if pred(x) {
                            *out = op(x);
                        }
                    }
                })
        });
        Ok(n)
    }
}

impl TransformIfStencil for DeviceStream {
    fn transform_if_stencil<I, S, O, F, P>(
        &self,
        input: I,
        stencil: S,
        mut output: O,
        op: F,
        pred: P,
    ) -> Result<usize>
    where
        I: InputSequence,
        S: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        S::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
        P: Fn(&S::Item) -> bool + Sync + Send,
    {
        let src = input.as_slice();
        let mask = stencil.as_slice();
        let n = src.len();
        let dst = output.as_mut_slice();
        ensure_len("stencil", n, mask.len())?;
        ensure_len("output", n, dst.len())?;
        let (mask, dst) = (&mask[..n], &mut dst[..n]);
        let block = self.block_size;

        self.launch(|| {
            dst.par_chunks_mut(block)
                .zip(src.par_chunks(block).zip(mask.par_chunks(block)))
                .for_each(|(d, (xs, ss))| {
                    for (out, (x, s)) in d.iter_mut().zip(xs.iter().zip(ss)) {
                        if pred(s) {
                            *out = op(x);
                        }
                    }
                })
        });
        Ok(n)
    }
}

impl BinaryTransformIf for DeviceStream {
    fn transform_binary_if<I1, I2, S, O, F, P>(
        &self,
        input1: I1,
        input2: I2,
        stencil: S,
        mut output: O,
        op: F,
        pred: P,
    ) -> Result<usize>
    where
        I1: InputSequence,
        I2: InputSequence,
        S: InputSequence,
        O: OutputSequence,
        I1::Item: Sync,
        I2::Item: Sync,
        S::Item: Sync,
        O::Item: Send,
        F: Fn(&I1::Item, &I2::Item) -> O::Item + Sync + Send,
        P: Fn(&S::Item) -> bool + Sync + Send,
    {
        let a = input1.as_slice();
        let b = input2.as_slice();
        let mask = stencil.as_slice();
        let n = a.len();
        let dst = output.as_mut_slice();
        ensure_len("second input", n, b.len())?;
        ensure_len("stencil", n, mask.len())?;
        ensure_len("output", n, dst.len())?;
        let (b, mask, dst) = (&b[..n], &mask[..n], &mut dst[..n]);
        let block = self.block_size;

        self.launch(|| {
            dst.par_chunks_mut(block)
                .zip(
                    a.par_chunks(block)
                        .zip(b.par_chunks(block))
                        .zip(mask.par_chunks(block)),
                )
                .for_each(|(d, ((xs, ys), ss))| {
                    for (out, ((x, y), s)) in d.iter_mut().zip(xs.iter().zip(ys).zip(ss)) {
                        if pred(s) {
                            *out = op(x, y);
                        }
                    }
                })
        });
        Ok(n)
    }
}

impl Transform for ParallelDevice {
    fn transform<I, O, F>(&self, input: I, output: O, op: F) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
    {
        DeviceStream::default().transform(input, output, op)
    }
}

impl BinaryTransform for ParallelDevice {
    fn transform_binary<I1, I2, O, F>(
        &self,
        input1: I1,
        input2: I2,
        output: O,
        op: F,
    ) -> Result<usize>
    where
        I1: InputSequence,
        I2: InputSequence,
        O: OutputSequence,
        I1::Item: Sync,
        I2::Item: Sync,
        O::Item: Send,
        F: Fn(&I1::Item, &I2::Item) -> O::Item + Sync + Send,
    {
        DeviceStream::default().transform_binary(input1, input2, output, op)
    }
}

impl TransformIf for ParallelDevice {
    fn transform_if<I, O, F, P>(&self, input: I, output: O, op: F, pred: P) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
        P: Fn(&I::Item) -> bool + Sync + Send,
    {
        DeviceStream::default().transform_if(input, output, op, pred)
    }
}

impl TransformIfStencil for ParallelDevice {
    fn transform_if_stencil<I, S, O, F, P>(
        &self,
        input: I,
        stencil: S,
        output: O,
        op: F,
        pred: P,
    ) -> Result<usize>
    where
        I: InputSequence,
        S: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        S::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
        P: Fn(&S::Item) -> bool + Sync + Send,
    {
        DeviceStream::default().transform_if_stencil(input, stencil, output, op, pred)
    }
}

impl BinaryTransformIf for ParallelDevice {
    fn transform_binary_if<I1, I2, S, O, F, P>(
        &self,
        input1: I1,
        input2: I2,
        stencil: S,
        output: O,
        op: F,
        pred: P,
    ) -> Result<usize>
    where
        I1: InputSequence,
        I2: InputSequence,
        S: InputSequence,
        O: OutputSequence,
        I1::Item: Sync,
        I2::Item: Sync,
        S::Item: Sync,
        O::Item: Send,
        F: Fn(&I1::Item, &I2::Item) -> O::Item + Sync + Send,
        P: Fn(&S::Item) -> bool + Sync + Send,
    {
        DeviceStream::default().transform_binary_if(input1, input2, stencil, output, op, pred)
    }
}
