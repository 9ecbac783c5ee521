//! Sequence cursors: tag extraction and element access
//!
//! Every argument of a front-end entry point is a sequence cursor. Two
//! independent views are defined over them:
//!
//! - [`HasBackendTag`]: the backend the cursor is associated with, a static
//!   property of its type. Plain slices, arrays and vectors carry no backend
//!   and report [`AnyTag`], so they never force one.
//! - [`InputSequence`] / [`OutputSequence`]: element access used by the
//!   backend that ends up executing the call.
//!
//! [`Tagged`] attaches a backend to any sequence without copying it.

use crate::tag::{AnyTag, BackendTag};
use crate::Sequential;
use std::marker::PhantomData;

/// Static association between a cursor type and a backend
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not associated with any backend",
    label = "cannot extract a backend tag from this argument",
    note = "wrap the sequence in `Tagged` or implement `HasBackendTag` for it"
)]
pub trait HasBackendTag {
    type Tag: BackendTag;
}

/// Recover the backend tag of a cursor from its type alone
#[inline]
pub fn tag_of<C: HasBackendTag + ?Sized>(_cursor: &C) -> C::Tag {
    C::Tag::default()
}

impl<T> HasBackendTag for [T] {
    type Tag = AnyTag;
}

impl<T, const N: usize> HasBackendTag for [T; N] {
    type Tag = AnyTag;
}

impl<T> HasBackendTag for Vec<T> {
    type Tag = AnyTag;
}

impl<C: HasBackendTag + ?Sized> HasBackendTag for &C {
    type Tag = C::Tag;
}

impl<C: HasBackendTag + ?Sized> HasBackendTag for &mut C {
    type Tag = C::Tag;
}

/// Read access to the elements of an input sequence
pub trait InputSequence {
    type Item;

    fn as_slice(&self) -> &[Self::Item];

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write access to the elements of an output sequence
pub trait OutputSequence {
    type Item;

    fn as_mut_slice(&mut self) -> &mut [Self::Item];
}

impl<T> InputSequence for [T] {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> InputSequence for [T; N] {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> InputSequence for Vec<T> {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<S: InputSequence + ?Sized> InputSequence for &S {
    type Item = S::Item;

    fn as_slice(&self) -> &[Self::Item] {
        S::as_slice(self)
    }
}

impl<S: InputSequence + ?Sized> InputSequence for &mut S {
    type Item = S::Item;

    fn as_slice(&self) -> &[Self::Item] {
        S::as_slice(self)
    }
}

impl<T> OutputSequence for [T] {
    type Item = T;

    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T, const N: usize> OutputSequence for [T; N] {
    type Item = T;

    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T> OutputSequence for Vec<T> {
    type Item = T;

    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<S: OutputSequence + ?Sized> OutputSequence for &mut S {
    type Item = S::Item;

    fn as_mut_slice(&mut self) -> &mut [Self::Item] {
        S::as_mut_slice(self)
    }
}

/// A sequence associated with the backend `Tag`
///
/// The tag lives only in the type; `Tagged` has the size of `S`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tagged<S, Tag> {
    inner: S,
    tag: PhantomData<Tag>,
}

impl<S, Tag: BackendTag> Tagged<S, Tag> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            tag: PhantomData,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Associate the same sequence with another backend
    pub fn retag<U: BackendTag>(self) -> Tagged<S, U> {
        Tagged::new(self.inner)
    }
}

impl<S, Tag: BackendTag> HasBackendTag for Tagged<S, Tag> {
    type Tag = Tag;
}

impl<S: InputSequence, Tag> InputSequence for Tagged<S, Tag> {
    type Item = S::Item;

    fn as_slice(&self) -> &[Self::Item] {
        self.inner.as_slice()
    }
}

impl<S: OutputSequence, Tag> OutputSequence for Tagged<S, Tag> {
    type Item = S::Item;

    fn as_mut_slice(&mut self) -> &mut [Self::Item] {
        self.inner.as_mut_slice()
    }
}

/// Associate `inner` with the sequential backend
///
/// The wrapper's tag replaces whatever tag `inner` carries on its own, so
/// `seq` over a cursor bound to another backend moves that call to the
/// sequential backend without any check.
pub fn seq<S>(inner: S) -> Tagged<S, Sequential> {
    Tagged::new(inner)
}
