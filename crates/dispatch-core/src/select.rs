//! Static backend resolution
//!
//! [`SelectSystem`] folds a tuple of backend tags with [`Join`], pairwise
//! and left to right. Because every generated `Join` impl exists in both
//! directions and always picks the more specific tag, the result does not
//! depend on argument order or grouping.
//!
//! - `()` resolves to [`AnyTag`]
//! - `(A,)` resolves to `A`
//! - `(A, B, ...)` resolves to the most specific tag of the chain
//!
//! Tags that are not on one chain have no `Join` impl, so resolution is a
//! build error rather than a runtime choice:
//!
//! ```compile_fail
//! use dispatch_core::{backend_tag, select::Selected, AnyTag};
//!
//! backend_tag! { struct Left("left"); }
//! backend_tag! { struct Right("right"); }
//!
//! // `Left` and `Right` have no common refinement
//! let _resolved: Selected<(Left, Right)> = Default::default();
//! ```

use crate::tag::{AnyTag, BackendTag, Join, JoinOf};

/// Resolution of a tuple of argument tags to one backend
pub trait SelectSystem {
    type Output: BackendTag;
}

/// The backend selected for the tag tuple `T`
pub type Selected<T> = <T as SelectSystem>::Output;

/// Value form of [`SelectSystem`]
///
/// ```rust
/// use dispatch_core::{select::select_system, AnyTag, Sequential};
///
/// assert_eq!(select_system(()), AnyTag);
/// assert_eq!(select_system((AnyTag, Sequential, AnyTag)), Sequential);
/// ```
#[inline]
pub fn select_system<T: SelectSystem>(_tags: T) -> Selected<T> {
    Selected::<T>::default()
}

impl SelectSystem for () {
    type Output = AnyTag;
}

impl<A: BackendTag> SelectSystem for (A,) {
    type Output = A;
}

impl<A, B> SelectSystem for (A, B)
where
    A: Join<B>,
{
    type Output = JoinOf<A, B>;
}

// Longer tuples join their first two tags and recurse on the shorter tuple
macro_rules! impl_select_system {
    ($a:ident, $b:ident, $($rest:ident),+) => {
        impl<$a, $b, $($rest),+> SelectSystem for ($a, $b, $($rest),+)
        where
            $a: Join<$b>,
            (JoinOf<$a, $b>, $($rest),+): SelectSystem,
        {
            type Output = Selected<(JoinOf<$a, $b>, $($rest),+)>;
        }
    };
}

impl_select_system!(A, B, C);
impl_select_system!(A, B, C, D);
impl_select_system!(A, B, C, D, E);
impl_select_system!(A, B, C, D, E, F);
