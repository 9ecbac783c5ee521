//! Backend registration interface
//!
//! One trait per operation, implemented on the policy type of each backend.
//! The front end finds a backend's implementation purely through these impls,
//! keyed on the normalized policy type, so adding a backend never touches
//! the front-end signatures. A backend that leaves an operation out simply
//! cannot be selected for it: the build fails with the message below.
//!
//! Every operation has the same contract:
//!
//! - `n` is the length of the first input; second inputs, stencils and the
//!   output must hold at least `n` elements, otherwise
//!   [`Error::SizeMismatch`](crate::Error::SizeMismatch) is returned before
//!   any element is touched
//! - only the first `n` output positions are written
//! - predicated variants leave positions whose predicate is false untouched
//! - the return value is `n`, the output position one past the last written

use crate::cursor::{InputSequence, OutputSequence};
use crate::policy::ExecutionPolicy;
use crate::Result;

/// `output[i] = op(&input[i])`
#[diagnostic::on_unimplemented(
    message = "no `transform` implementation is registered for backend `{Self}`",
    label = "backend does not implement `Transform`"
)]
pub trait Transform: ExecutionPolicy {
    fn transform<I, O, F>(&self, input: I, output: O, op: F) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send;
}

/// `output[i] = op(&input1[i], &input2[i])`
#[diagnostic::on_unimplemented(
    message = "no binary `transform` implementation is registered for backend `{Self}`",
    label = "backend does not implement `BinaryTransform`"
)]
pub trait BinaryTransform: ExecutionPolicy {
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
        F: Fn(&I1::Item, &I2::Item) -> O::Item + Sync + Send;
}

/// `if pred(&input[i]) { output[i] = op(&input[i]) }`
#[diagnostic::on_unimplemented(
    message = "no `transform_if` implementation is registered for backend `{Self}`",
    label = "backend does not implement `TransformIf`"
)]
pub trait TransformIf: ExecutionPolicy {
    fn transform_if<I, O, F, P>(&self, input: I, output: O, op: F, pred: P) -> Result<usize>
    where
        I: InputSequence,
        O: OutputSequence,
        I::Item: Sync,
        O::Item: Send,
        F: Fn(&I::Item) -> O::Item + Sync + Send,
        P: Fn(&I::Item) -> bool + Sync + Send;
}

/// `if pred(&stencil[i]) { output[i] = op(&input[i]) }`
#[diagnostic::on_unimplemented(
    message = "no stencil `transform_if` implementation is registered for backend `{Self}`",
    label = "backend does not implement `TransformIfStencil`"
)]
pub trait TransformIfStencil: ExecutionPolicy {
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
        P: Fn(&S::Item) -> bool + Sync + Send;
}

/// `if pred(&stencil[i]) { output[i] = op(&input1[i], &input2[i]) }`
#[diagnostic::on_unimplemented(
    message = "no binary `transform_if` implementation is registered for backend `{Self}`",
    label = "backend does not implement `BinaryTransformIf`"
)]
pub trait BinaryTransformIf: ExecutionPolicy {
    #[allow(clippy::too_many_arguments)]
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
        P: Fn(&S::Item) -> bool + Sync + Send;
}
