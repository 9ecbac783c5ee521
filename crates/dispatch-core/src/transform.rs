//! Generic front-end entry points
//!
//! Each operation comes in two forms:
//!
//! - **implicit** (`transform`, `transform_if`, ...): the backend tag of
//!   every cursor argument is extracted from its type, the tags are resolved
//!   with [`SelectSystem`], and the call is forwarded to the resolved
//!   backend's implementation
//! - **explicit** (`*_with`): the caller passes an execution policy, which is
//!   normalized and used as is; cursor tags are ignored
//!
//! Both forms are fully monomorphized. The front end does no element work of
//! its own and passes its arguments through unchanged and in order.
//!
//! ```rust
//! use dispatch_core::{seq, transform, transform_with, Sequential};
//!
//! let input = vec![1, 2, 3];
//! let mut output = vec![0; 3];
//!
//! // Untagged slices resolve to `AnyTag`, which runs sequentially
//! transform(&input, &mut output, |x| x + 1).unwrap();
//! assert_eq!(output, vec![2, 3, 4]);
//!
//! transform(seq(&input), &mut output, |x| x * 2).unwrap();
//! assert_eq!(output, vec![2, 4, 6]);
//!
//! transform_with(&Sequential, &input, &mut output, |x| -x).unwrap();
//! assert_eq!(output, vec![-1, -2, -3]);
//! ```
//!
//! A resolved backend without an implementation of the requested operation
//! is rejected at build time:
//!
//! ```compile_fail
//! use dispatch_core::{backend_tag, transform, Tagged};
//!
//! backend_tag! { struct Unfinished("unfinished"); }
//!
//! let input = vec![1, 2, 3];
//! let mut output = vec![0; 3];
//! let cursor: Tagged<_, Unfinished> = Tagged::new(&input);
//! transform(cursor, &mut output, |x| x + 1).unwrap();
//! ```
//!
//! So is a policy that is not registered with any backend:
//!
//! ```compile_fail
//! use dispatch_core::transform_with;
//!
//! let input = vec![1, 2, 3];
//! let mut output = vec![0; 3];
//! transform_with(42u32, &input, &mut output, |x| x + 1).unwrap();
//! ```

use crate::cursor::{tag_of, HasBackendTag, InputSequence, OutputSequence};
use crate::policy::{ExecutionPolicy, Normalize};
use crate::select::{select_system, SelectSystem, Selected};
use crate::system::{BinaryTransform, BinaryTransformIf, Transform, TransformIf, TransformIfStencil};
use crate::Result;
use tracing::trace_span;

/// Apply `op` to every element of `input`, writing to `output`
///
/// Resolves the backend from the tags of `input` and `output`.
pub fn transform<I, O, F>(input: I, output: O, op: F) -> Result<usize>
where
    I: InputSequence + HasBackendTag,
    O: OutputSequence + HasBackendTag,
    I::Item: Sync,
    O::Item: Send,
    F: Fn(&I::Item) -> O::Item + Sync + Send,
    (I::Tag, O::Tag): SelectSystem,
    Selected<(I::Tag, O::Tag)>: Transform,
{
    let system = select_system((tag_of(&input), tag_of(&output)));
    let _span = trace_span!("transform", backend = system.backend_name(), policy = false).entered();
    system.transform(input, output, op)
}

/// [`transform`] on the backend named by `exec`
pub fn transform_with<X, I, O, F>(exec: X, input: I, output: O, op: F) -> Result<usize>
where
    X: Normalize,
    X::Output: Transform,
    I: InputSequence,
    O: OutputSequence,
    I::Item: Sync,
    O::Item: Send,
    F: Fn(&I::Item) -> O::Item + Sync + Send,
{
    let policy = exec.normalize();
    let _span = trace_span!("transform", backend = policy.backend_name(), policy = true).entered();
    policy.transform(input, output, op)
}

/// Apply `op` pairwise to `input1` and `input2`, writing to `output`
///
/// Resolves the backend from the tags of all three sequences.
pub fn transform_binary<I1, I2, O, F>(input1: I1, input2: I2, output: O, op: F) -> Result<usize>
where
    I1: InputSequence + HasBackendTag,
    I2: InputSequence + HasBackendTag,
    O: OutputSequence + HasBackendTag,
    I1::Item: Sync,
    I2::Item: Sync,
    O::Item: Send,
    F: Fn(&I1::Item, &I2::Item) -> O::Item + Sync + Send,
    (I1::Tag, I2::Tag, O::Tag): SelectSystem,
    Selected<(I1::Tag, I2::Tag, O::Tag)>: BinaryTransform,
{
    let system = select_system((tag_of(&input1), tag_of(&input2), tag_of(&output)));
    let _span = trace_span!("transform_binary", backend = system.backend_name(), policy = false).entered();
    system.transform_binary(input1, input2, output, op)
}

/// [`transform_binary`] on the backend named by `exec`
pub fn transform_binary_with<X, I1, I2, O, F>(
    exec: X,
    input1: I1,
    input2: I2,
    output: O,
    op: F,
) -> Result<usize>
where
    X: Normalize,
    X::Output: BinaryTransform,
    I1: InputSequence,
    I2: InputSequence,
    O: OutputSequence,
    I1::Item: Sync,
    I2::Item: Sync,
    O::Item: Send,
    F: Fn(&I1::Item, &I2::Item) -> O::Item + Sync + Send,
{
    let policy = exec.normalize();
    let _span = trace_span!("transform_binary", backend = policy.backend_name(), policy = true).entered();
    policy.transform_binary(input1, input2, output, op)
}

/// Apply `op` to the elements of `input` that satisfy `pred`
///
/// Positions whose element fails `pred` keep their previous output value.
pub fn transform_if<I, O, F, P>(input: I, output: O, op: F, pred: P) -> Result<usize>
where
    I: InputSequence + HasBackendTag,
    O: OutputSequence + HasBackendTag,
    I::Item: Sync,
    O::Item: Send,
    F: Fn(&I::Item) -> O::Item + Sync + Send,
    P: Fn(&I::Item) -> bool + Sync + Send,
    (I::Tag, O::Tag): SelectSystem,
    Selected<(I::Tag, O::Tag)>: TransformIf,
{
    let system = select_system((tag_of(&input), tag_of(&output)));
    let _span = trace_span!("transform_if", backend = system.backend_name(), policy = false).entered();
    system.transform_if(input, output, op, pred)
}

/// [`transform_if`] on the backend named by `exec`
pub fn transform_if_with<X, I, O, F, P>(exec: X, input: I, output: O, op: F, pred: P) -> Result<usize>
where
    X: Normalize,
    X::Output: TransformIf,
    I: InputSequence,
    O: OutputSequence,
    I::Item: Sync,
    O::Item: Send,
    F: Fn(&I::Item) -> O::Item + Sync + Send,
    P: Fn(&I::Item) -> bool + Sync + Send,
{
    let policy = exec.normalize();
    let _span = trace_span!("transform_if", backend = policy.backend_name(), policy = true).entered();
    policy.transform_if(input, output, op, pred)
}

/// Apply `op` to the elements of `input` whose `stencil` entry satisfies `pred`
pub fn transform_if_stencil<I, S, O, F, P>(
    input: I,
    stencil: S,
    output: O,
    op: F,
    pred: P,
) -> Result<usize>
where
    I: InputSequence + HasBackendTag,
    S: InputSequence + HasBackendTag,
    O: OutputSequence + HasBackendTag,
    I::Item: Sync,
    S::Item: Sync,
    O::Item: Send,
    F: Fn(&I::Item) -> O::Item + Sync + Send,
    P: Fn(&S::Item) -> bool + Sync + Send,
    (I::Tag, S::Tag, O::Tag): SelectSystem,
    Selected<(I::Tag, S::Tag, O::Tag)>: TransformIfStencil,
{
    let system = select_system((tag_of(&input), tag_of(&stencil), tag_of(&output)));
    let _span = trace_span!("transform_if_stencil", backend = system.backend_name(), policy = false).entered();
    system.transform_if_stencil(input, stencil, output, op, pred)
}

/// [`transform_if_stencil`] on the backend named by `exec`
pub fn transform_if_stencil_with<X, I, S, O, F, P>(
    exec: X,
    input: I,
    stencil: S,
    output: O,
    op: F,
    pred: P,
) -> Result<usize>
where
    X: Normalize,
    X::Output: TransformIfStencil,
    I: InputSequence,
    S: InputSequence,
    O: OutputSequence,
    I::Item: Sync,
    S::Item: Sync,
    O::Item: Send,
    F: Fn(&I::Item) -> O::Item + Sync + Send,
    P: Fn(&S::Item) -> bool + Sync + Send,
{
    let policy = exec.normalize();
    let _span = trace_span!("transform_if_stencil", backend = policy.backend_name(), policy = true).entered();
    policy.transform_if_stencil(input, stencil, output, op, pred)
}

/// Apply `op` pairwise where the `stencil` entry satisfies `pred`
///
/// Resolves the backend from the tags of all four sequences.
pub fn transform_binary_if<I1, I2, S, O, F, P>(
    input1: I1,
    input2: I2,
    stencil: S,
    output: O,
    op: F,
    pred: P,
) -> Result<usize>
where
    I1: InputSequence + HasBackendTag,
    I2: InputSequence + HasBackendTag,
    S: InputSequence + HasBackendTag,
    O: OutputSequence + HasBackendTag,
    I1::Item: Sync,
    I2::Item: Sync,
    S::Item: Sync,
    O::Item: Send,
    F: Fn(&I1::Item, &I2::Item) -> O::Item + Sync + Send,
    P: Fn(&S::Item) -> bool + Sync + Send,
    (I1::Tag, I2::Tag, S::Tag, O::Tag): SelectSystem,
    Selected<(I1::Tag, I2::Tag, S::Tag, O::Tag)>: BinaryTransformIf,
{
    let system = select_system((
        tag_of(&input1),
        tag_of(&input2),
        tag_of(&stencil),
        tag_of(&output),
    ));
    let _span = trace_span!("transform_binary_if", backend = system.backend_name(), policy = false).entered();
    system.transform_binary_if(input1, input2, stencil, output, op, pred)
}

/// [`transform_binary_if`] on the backend named by `exec`
#[allow(clippy::too_many_arguments)]
pub fn transform_binary_if_with<X, I1, I2, S, O, F, P>(
    exec: X,
    input1: I1,
    input2: I2,
    stencil: S,
    output: O,
    op: F,
    pred: P,
) -> Result<usize>
where
    X: Normalize,
    X::Output: BinaryTransformIf,
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
    let policy = exec.normalize();
    let _span = trace_span!("transform_binary_if", backend = policy.backend_name(), policy = true).entered();
    policy.transform_binary_if(input1, input2, stencil, output, op, pred)
}
