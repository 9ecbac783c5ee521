//! Multi-threaded host backend using Rayon
//!
//! [`ParallelHost`] refines [`Sequential`]: both operate on host memory, so
//! a call mixing sequential and parallel-host cursors runs in parallel.
//!
//! The tag itself runs on Rayon's global pool. [`HostPool`] is the
//! configured policy for running on a dedicated pool instead.

use dispatch_core::{
    backend_tag, ensure_len, execution_policy, BinaryTransform, BinaryTransformIf, Error,
    InputSequence, OutputSequence, Result, Sequential, Tagged, Transform, TransformIf,
    TransformIfStencil,
};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

backend_tag! {
    /// Data-parallel execution on host threads
    pub struct ParallelHost("parallel-host") refines Sequential;
}

/// Associate `inner` with the parallel host backend
///
/// The wrapper's tag replaces whatever tag `inner` carries on its own.
/// `par(&device_vec)` is a host cursor over device storage and resolves to
/// [`ParallelHost`], not [`ParallelDevice`](crate::ParallelDevice).
pub fn par<S>(inner: S) -> Tagged<S, ParallelHost> {
    Tagged::new(inner)
}

/// Parallel host policy with an optional dedicated thread pool
#[derive(Clone, Debug, Default)]
pub struct HostPool {
    thread_pool: Option<Arc<rayon::ThreadPool>>,
}

execution_policy!(HostPool => ParallelHost);

impl HostPool {
    /// Policy using Rayon's global thread pool
    pub fn new() -> Self {
        Self { thread_pool: None }
    }

    /// Policy running on an existing thread pool
    pub fn with_thread_pool(pool: Arc<rayon::ThreadPool>) -> Self {
        Self {
            thread_pool: Some(pool),
        }
    }

    /// Policy running on a new pool of `num_threads` threads
    pub fn with_num_threads(num_threads: usize) -> Result<Self> {
        if num_threads == 0 {
            return Err(Error::InvalidParameter(
                "host pool needs at least one thread".to_string(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("dispatch-host-{i}"))
            .build()
            .map_err(|e| Error::Execution(format!("Failed to create thread pool: {e}")))?;

        debug!(num_threads, "created host thread pool");
        Ok(Self::with_thread_pool(Arc::new(pool)))
    }

    /// Number of threads calls on this policy may use
    pub fn num_threads(&self) -> usize {
        if let Some(pool) = &self.thread_pool {
            pool.current_num_threads()
        } else {
            rayon::current_num_threads()
        }
    }

    /// Whether this policy owns a dedicated pool
    pub fn is_dedicated(&self) -> bool {
        self.thread_pool.is_some()
    }

    fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if let Some(pool) = &self.thread_pool {
            pool.install(f)
        } else {
            f()
        }
    }
}

impl PartialEq for HostPool {
    fn eq(&self, other: &Self) -> bool {
        match (&self.thread_pool, &other.thread_pool) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Transform for HostPool {
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

        self.install(|| {
            dst.par_iter_mut()
                .zip(src.par_iter())
                .for_each(|(out, x)| *out = op(x))
        });
        Ok(n)
    }
}

impl BinaryTransform for HostPool {
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

        self.install(|| {
            dst.par_iter_mut()
                .zip(a.par_iter().zip(b.par_iter()))
                .for_each(|(out, (x, y))| *out = op(x, y))
        });
        Ok(n)
    }
}

impl TransformIf for HostPool {
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

        self.install(|| {
            dst.par_iter_mut().zip(src.par_iter()).for_each(|(out, x)| {
                if pred(x) {
                    *out = op(x);
                }
            })
        });
        Ok(n)
    }
}

impl TransformIfStencil for HostPool {
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

        self.install(|| {
            dst.par_iter_mut()
                .zip(src.par_iter().zip(mask.par_iter()))
                .for_each(|(out, (x, s))| {
                    if pred(s) {
                        *out = op(x);
                    }
                })
        });
        Ok(n)
    }
}

impl BinaryTransformIf for HostPool {
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

        self.install(|| {
            dst.par_iter_mut()
                .zip(a.par_iter().zip(b.par_iter()).zip(mask.par_iter()))
                .for_each(|(out, ((x, y), s))| {
                    if pred(s) {
                        *out = op(x, y);
                    }
                })
        });
        Ok(n)
    }
}

// The bare tag runs on the global pool
impl Transform for ParallelHost {
    fn transform<I, O, F>(&self, input: I, output: O, op: F) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
    {
        HostPool::new().transform(input, output, op)
    }
}

impl BinaryTransform for ParallelHost {
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
        HostPool::new().transform_binary(input1, input2, output, op)
    }
}

impl TransformIf for ParallelHost {
    fn transform_if<I, O, F, P>(&self, input: I, output: O, op: F, pred: P) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
        P: Fn(&I::Item) -> bool + Sync + Send,
    {
        HostPool::new().transform_if(input, output, op, pred)
    }
}

impl TransformIfStencil for ParallelHost {
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
        HostPool::new().transform_if_stencil(input, stencil, output, op, pred)
    }
}

impl BinaryTransformIf for ParallelHost {
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
        HostPool::new().transform_binary_if(input1, input2, stencil, output, op, pred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::{normalize, BackendTag, ExecutionPolicy, TagInfo};

    #[test]
    fn test_tag_hierarchy() {
        assert_eq!(ParallelHost::NAME, "parallel-host");
        assert_eq!(ParallelHost::DEPTH, 2);
        assert_eq!(
            ParallelHost::LINEAGE,
            &["parallel-host", "sequential", "any"]
        );
        assert!(TagInfo::of::<ParallelHost>().refines(&TagInfo::of::<Sequential>()));
    }

    #[test]
    fn test_par_overrides_intrinsic_tag() {
        let device = crate::DeviceVec::upload(&[1, 2, 3]);
        assert_eq!(dispatch_core::tag_of(&device), crate::ParallelDevice);
        assert_eq!(dispatch_core::tag_of(&par(&device)), ParallelHost);

        let mut output = vec![0; 3];
        dispatch_core::transform(par(&device), &mut output, |x| x * 3).unwrap();
        assert_eq!(output, vec![3, 6, 9]);
    }

    #[test]
    fn test_global_pool_policy() {
        let policy = HostPool::new();
        assert!(!policy.is_dedicated());
        assert!(policy.num_threads() > 0);
        assert_eq!(policy.backend_name(), "parallel-host");
        assert_eq!(policy, HostPool::default());
    }

    #[test]
    fn test_dedicated_pool_policy() {
        let policy = HostPool::with_num_threads(2).unwrap();
        assert!(policy.is_dedicated());
        assert_eq!(policy.num_threads(), 2);
        assert_eq!(policy.clone(), policy);
        assert_ne!(policy, HostPool::with_num_threads(2).unwrap());
        assert_eq!(normalize(&policy), policy);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = HostPool::with_num_threads(0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_transform_runs_on_dedicated_pool() {
        let policy = HostPool::with_num_threads(2).unwrap();
        let input: Vec<u64> = (0..1000).collect();
        let mut output = vec![0u64; 1000];
        let mut names = vec![String::new(); 1000];

        let n = policy.transform(&input, &mut output, |x| x * x).unwrap();
        assert_eq!(n, 1000);
        assert!(output.iter().enumerate().all(|(i, o)| *o == (i * i) as u64));

        policy
            .transform(&input, &mut names, |_| {
                std::thread::current().name().unwrap_or_default().to_string()
            })
            .unwrap();
        assert!(names.iter().all(|name| name.starts_with("dispatch-host-")));
    }

    #[test]
    fn test_predicated_operations() {
        let a: Vec<i32> = (0..100).collect();
        let b: Vec<i32> = (0..100).rev().collect();
        let stencil: Vec<bool> = a.iter().map(|x| x % 4 == 0).collect();
        let mut output = vec![-1; 100];

        ParallelHost
            .transform_if(&a, &mut output, |x| x * 2, |x| *x >= 50)
            .unwrap();
        assert_eq!(output[49], -1);
        assert_eq!(output[50], 100);

        ParallelHost
            .transform_binary_if(&a, &b, &stencil, &mut output, |x, y| x + y, |s| *s)
            .unwrap();
        assert_eq!(output[0], 99);
        assert_eq!(output[1], -1);
        assert_eq!(output[52], 99);
        assert_eq!(output[53], 106);
    }

    #[test]
    fn test_length_checks() {
        let a = vec![1, 2, 3];
        let mut output = vec![0; 3];
        let err = ParallelHost
            .transform_binary(&a, &a[..1], &mut output, |x, y| x + y)
            .unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { operand: "second input", .. }));

        let err = ParallelHost
            .transform_if_stencil(&a, &[true], &mut output, |x| *x, |s| *s)
            .unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { operand: "stencil", .. }));
        assert_eq!(output, vec![0, 0, 0]);
    }
}
