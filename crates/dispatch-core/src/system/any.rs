//! Default backend for calls whose arguments declare no backend
//!
//! When every argument is untagged the resolver yields [`AnyTag`]. Rather
//! than treating that as a separate "no backend" case, `AnyTag` is a backend
//! in its own right whose implementations forward to [`Sequential`].

use super::traits::{BinaryTransform, BinaryTransformIf, Transform, TransformIf, TransformIfStencil};
use super::Sequential;
use crate::cursor::{InputSequence, OutputSequence};
use crate::tag::AnyTag;
use crate::Result;

/// The backend untagged calls run on
pub type DefaultSystem = Sequential;

impl Transform for AnyTag {
    #[inline]
    fn transform<I, O, F>(&self, input: I, output: O, op: F) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
    {
        DefaultSystem::default().transform(input, output, op)
    }
}

impl BinaryTransform for AnyTag {
    #[inline]
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
        DefaultSystem::default().transform_binary(input1, input2, output, op)
    }
}

impl TransformIf for AnyTag {
    #[inline]
    fn transform_if<I, O, F, P>(&self, input: I, output: O, op: F, pred: P) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
        P: Fn(&I::Item) -> bool + Sync + Send,
    {
        DefaultSystem::default().transform_if(input, output, op, pred)
    }
}

impl TransformIfStencil for AnyTag {
    #[inline]
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
        DefaultSystem::default().transform_if_stencil(input, stencil, output, op, pred)
    }
}

impl BinaryTransformIf for AnyTag {
    #[inline]
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
        DefaultSystem::default().transform_binary_if(input1, input2, stencil, output, op, pred)
    }
}
