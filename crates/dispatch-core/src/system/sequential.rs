//! Sequential backend implementation
//!
//! Runs every operation in order on the calling thread. This is also what
//! [`AnyTag`](crate::AnyTag) forwards to when no argument names a backend.

use super::traits::{BinaryTransform, BinaryTransformIf, Transform, TransformIf, TransformIfStencil};
use crate::cursor::{InputSequence, OutputSequence};
use crate::error::ensure_len;
use crate::Result;

crate::backend_tag! {
    /// In-order execution on the calling thread
    pub struct Sequential("sequential");
}

impl Transform for Sequential {
    fn transform<I, O, F>(&self, input: I, mut output: O, op: F) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
    {
        let src = input.as_slice();
        let dst = output.as_mut_slice();
        ensure_len("output", src.len(), dst.len())?;

        for (out, x) in dst.iter_mut().zip(src) {
            *out = op(x);
        }
        Ok(src.len())
    }
}

impl BinaryTransform for Sequential {
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
        let dst = output.as_mut_slice();
        let n = a.len();
        ensure_len("second input", n, b.len())?;
        ensure_len("output", n, dst.len())?;

        for (out, (x, y)) in dst.iter_mut().zip(a.iter().zip(b)) {
            *out = op(x, y);
        }
        Ok(n)
    }
}

impl TransformIf for Sequential {
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
        let dst = output.as_mut_slice();
        ensure_len("output", src.len(), dst.len())?;

        for (out, x) in dst.iter_mut().zip(src) {
            if pred(x) {
                *out = op(x);
            }
        }
        Ok(src.len())
    }
}

impl TransformIfStencil for Sequential {
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
        let dst = output.as_mut_slice();
        let n = src.len();
        ensure_len("stencil", n, mask.len())?;
        ensure_len("output", n, dst.len())?;

        for (out, (x, s)) in dst.iter_mut().zip(src.iter().zip(mask)) {
            if pred(s) {
                *out = op(x);
            }
        }
        Ok(n)
    }
}

impl BinaryTransformIf for Sequential {
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
        let dst = output.as_mut_slice();
        let n = a.len();
        ensure_len("second input", n, b.len())?;
        ensure_len("stencil", n, mask.len())?;
        ensure_len("output", n, dst.len())?;

        for (out, ((x, y), s)) in dst.iter_mut().zip(a.iter().zip(b).zip(mask)) {
            if pred(s) {
                *out = op(x, y);
            }
        }
        Ok(n)
    }
}
