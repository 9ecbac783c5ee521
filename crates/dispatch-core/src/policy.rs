//! Execution policies and the override normalizer
//!
//! An execution policy names exactly one backend tag and may carry
//! backend-specific configuration (a thread pool, a device stream). Every
//! backend tag is itself a stateless policy.
//!
//! Callers may hand a policy to an explicit `*_with` entry point in whatever
//! wrapping is convenient: by reference, boxed, shared, or through a
//! [`PolicyBase`] handle. [`Normalize`] strips that wrapping so the dispatch
//! target is always the bare, most-derived policy type.
//!
//! Normalization is total and idempotent: a bare policy normalizes to
//! itself, and normalizing the result again changes nothing.

use crate::tag::BackendTag;
use std::rc::Rc;
use std::sync::Arc;

/// A value that selects one backend
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an execution policy of a registered backend",
    label = "not an execution policy",
    note = "policies are declared with `backend_tag!` or `execution_policy!`"
)]
pub trait ExecutionPolicy: Clone + Send + Sync {
    /// Backend this policy executes on
    type Tag: BackendTag;

    /// The backend tag value
    fn tag(&self) -> Self::Tag {
        Self::Tag::default()
    }

    /// Name of the backend this policy executes on
    fn backend_name(&self) -> &'static str {
        <Self::Tag as BackendTag>::NAME
    }
}

/// Reduce a possibly wrapped policy to its bare concrete policy
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not normalize to an execution policy",
    label = "expected an execution policy, or a reference, `Box`, `Rc`, `Arc` or `PolicyBase` around one"
)]
pub trait Normalize {
    /// The bare policy type
    type Output: ExecutionPolicy;

    fn normalize(self) -> Self::Output;
}

/// Normalize `policy`
pub fn normalize<P: Normalize>(policy: P) -> P::Output {
    policy.normalize()
}

impl<P: Normalize + Clone> Normalize for &P {
    type Output = P::Output;

    #[inline]
    fn normalize(self) -> Self::Output {
        self.clone().normalize()
    }
}

impl<P: Normalize + Clone> Normalize for &mut P {
    type Output = P::Output;

    #[inline]
    fn normalize(self) -> Self::Output {
        P::clone(self).normalize()
    }
}

impl<P: Normalize> Normalize for Box<P> {
    type Output = P::Output;

    #[inline]
    fn normalize(self) -> Self::Output {
        (*self).normalize()
    }
}

impl<P: Normalize + Clone> Normalize for Rc<P> {
    type Output = P::Output;

    #[inline]
    fn normalize(self) -> Self::Output {
        Rc::try_unwrap(self)
            .unwrap_or_else(|shared| P::clone(&shared))
            .normalize()
    }
}

impl<P: Normalize + Clone> Normalize for Arc<P> {
    type Output = P::Output;

    #[inline]
    fn normalize(self) -> Self::Output {
        Arc::try_unwrap(self)
            .unwrap_or_else(|shared| P::clone(&shared))
            .normalize()
    }
}

/// A policy viewed through the generic policy handle
///
/// Code that only needs "some policy" can hold a `PolicyBase<P>` without
/// naming the backend; normalizing it recovers the derived policy `P`
/// unchanged, configuration included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolicyBase<P> {
    derived: P,
}

impl<P: ExecutionPolicy> PolicyBase<P> {
    pub fn new(derived: P) -> Self {
        Self { derived }
    }

    /// The derived policy
    pub fn derived(&self) -> &P {
        &self.derived
    }

    pub fn into_derived(self) -> P {
        self.derived
    }

    /// Name of the backend the derived policy executes on
    pub fn backend_name(&self) -> &'static str {
        self.derived.backend_name()
    }
}

impl<P: Normalize> Normalize for PolicyBase<P> {
    type Output = P::Output;

    #[inline]
    fn normalize(self) -> Self::Output {
        self.derived.normalize()
    }
}

/// Register a concrete policy type for `tag`
///
/// Implements [`ExecutionPolicy`] and the identity [`Normalize`]. Backend
/// tags get this from [`backend_tag!`](crate::backend_tag); configured
/// policies invoke it directly.
#[macro_export]
macro_rules! execution_policy {
    ($policy:ty => $tag:ty) => {
        impl $crate::policy::ExecutionPolicy for $policy {
            type Tag = $tag;
        }

        impl $crate::policy::Normalize for $policy {
            type Output = $policy;

            #[inline]
            fn normalize(self) -> Self::Output {
                self
            }
        }
    };
}
