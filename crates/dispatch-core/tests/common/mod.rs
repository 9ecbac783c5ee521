//! Shared utilities for integration tests

#![allow(dead_code)]

use dispatch_core::{
    backend_tag, BinaryTransform, BinaryTransformIf, InputSequence, OutputSequence, Result,
    Sequential, Transform, TransformIf, TransformIfStencil,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;

backend_tag! {
    /// Sequential backend that records every call it receives
    pub struct Recording("recording") refines Sequential;
}

/// One call observed by the recording backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    /// Address of each operand's first element, in argument order
    pub operands: Vec<usize>,
}

thread_local! {
    static CALLS: RefCell<Vec<Call>> = const { RefCell::new(Vec::new()) };
}

fn record(op: &'static str, operands: Vec<usize>) {
    CALLS.with(|calls| calls.borrow_mut().push(Call { op, operands }));
}

/// Drain the calls recorded on this thread
pub fn take_calls() -> Vec<Call> {
    CALLS.with(|calls| calls.borrow_mut().drain(..).collect())
}

pub fn addr<T>(slice: &[T]) -> usize {
    slice.as_ptr() as usize
}

impl Transform for Recording {
    fn transform<I, O, F>(&self, input: I, mut output: O, op: F) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
    {
        record("transform", vec![addr(input.as_slice()), addr(output.as_mut_slice())]);
        Sequential.transform(input, output, op)
    }
}

impl BinaryTransform for Recording {
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
        record(
            "transform_binary",
            vec![
                addr(input1.as_slice()),
                addr(input2.as_slice()),
                addr(output.as_mut_slice()),
            ],
        );
        Sequential.transform_binary(input1, input2, output, op)
    }
}

impl TransformIf for Recording {
    fn transform_if<I, O, F, P>(&self, input: I, mut output: O, op: F, pred: P) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
        P: Fn(&I::Item) -> bool + Sync + Send,
    {
        record("transform_if", vec![addr(input.as_slice()), addr(output.as_mut_slice())]);
        Sequential.transform_if(input, output, op, pred)
    }
}

impl TransformIfStencil for Recording {
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
        record(
            "transform_if_stencil",
            vec![
                addr(input.as_slice()),
                addr(stencil.as_slice()),
                addr(output.as_mut_slice()),
            ],
        );
        Sequential.transform_if_stencil(input, stencil, output, op, pred)
    }
}

impl BinaryTransformIf for Recording {
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
        record(
            "transform_binary_if",
            vec![
                addr(input1.as_slice()),
                addr(input2.as_slice()),
                addr(stencil.as_slice()),
                addr(output.as_mut_slice()),
            ],
        );
        Sequential.transform_binary_if(input1, input2, stencil, output, op, pred)
    }
}

/// Seeded integer test data
pub fn generate_test_data(seed: u64, len: usize) -> Vec<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1_000..1_000)).collect()
}
