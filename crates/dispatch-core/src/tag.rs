//! Backend tags and the refinement order between them
//!
//! A backend tag is a zero-sized marker type naming one execution backend.
//! Tags form a rooted partial order: every tag refines [`AnyTag`], and a tag
//! may refine further, less specific tags (the parallel host backend refines
//! the sequential one because both run on host memory).
//!
//! # Design Philosophy
//!
//! - **Type-level only**: the order lives in trait impls, never in values
//! - **Open set**: [`backend_tag!`](crate::backend_tag) adds a tag and its
//!   edges from any crate, without touching existing tags
//! - **Static failure**: two tags without a [`Join`] impl cannot be combined,
//!   and the compiler says so
//!
//! # Example
//!
//! ```rust
//! use dispatch_core::{backend_tag, tag::{BackendTag, TagInfo}, Sequential};
//!
//! backend_tag! {
//!     /// Host execution with SIMD lanes
//!     pub struct Vectorized("vectorized") refines Sequential;
//! }
//!
//! let info = TagInfo::of::<Vectorized>();
//! assert_eq!(info.lineage, &["vectorized", "sequential", "any"]);
//! assert!(info.refines(&Sequential.info()));
//! assert_eq!(Vectorized::DEPTH, 2);
//! ```

use std::fmt::{self, Debug};

/// Marker trait for backend tags
///
/// Implemented by [`backend_tag!`](crate::backend_tag); only [`AnyTag`] is
/// written by hand.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a registered backend tag",
    label = "not part of the backend hierarchy",
    note = "declare backend tags with `dispatch_core::backend_tag!`"
)]
pub trait BackendTag: Copy + Default + Debug + Send + Sync + 'static {
    /// Human readable backend name
    const NAME: &'static str;

    /// Length of the longest refinement chain down to [`AnyTag`]
    const DEPTH: usize;

    /// This tag's name followed by the names of every tag it refines,
    /// ending with `"any"`
    const LINEAGE: &'static [&'static str];

    /// Runtime description of this tag
    fn info(self) -> TagInfo {
        TagInfo::of::<Self>()
    }
}

/// Join of two related tags: the more specific of the pair
///
/// Unrelated tags have no impl; asking for one is a
/// build error.
#[diagnostic::on_unimplemented(
    message = "ambiguous backend: `{Self}` and `{Rhs}` have no common refinement",
    label = "arguments are associated with unrelated backends",
    note = "pass an explicit execution policy through one of the `*_with` entry points"
)]
pub trait Join<Rhs> {
    /// The most specific of `Self` and `Rhs`
    type Output: BackendTag;
}

/// Shorthand for the join of two tags
pub type JoinOf<A, B> = <A as Join<B>>::Output;

/// `Self` is strictly more specific than `Ancestor`
///
/// [`backend_tag!`](crate::backend_tag) emits one edge per ancestor and
/// requires the ancestor list to be a chain of these edges. Downstream code
/// can also use it as a bound, e.g. to accept any host-memory backend with
/// `T: Refines<Sequential>`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not refine `{Ancestor}`",
    label = "ancestors of a backend tag must form a single chain",
    note = "list ancestors nearest first, each one refining the next"
)]
pub trait Refines<Ancestor: BackendTag>: BackendTag {}

/// Root of the hierarchy
///
/// Carried by arguments that do not declare a backend. It is the identity
/// of [`Join`]: combined with any tag it yields that tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnyTag;

impl BackendTag for AnyTag {
    const NAME: &'static str = "any";
    const DEPTH: usize = 0;
    const LINEAGE: &'static [&'static str] = &["any"];
}

impl Join<AnyTag> for AnyTag {
    type Output = AnyTag;
}

crate::execution_policy!(AnyTag => AnyTag);

/// Runtime view of a tag, for logging and assertions
///
/// Dispatch never looks at this; it exists so the hierarchy can be printed
/// and checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TagInfo {
    pub name: &'static str,
    pub depth: usize,
    pub lineage: &'static [&'static str],
}

impl TagInfo {
    /// Describe the tag type `T`
    pub fn of<T: BackendTag>() -> Self {
        Self {
            name: T::NAME,
            depth: T::DEPTH,
            lineage: T::LINEAGE,
        }
    }

    /// Whether this tag is strictly more specific than `other`
    pub fn refines(&self, other: &TagInfo) -> bool {
        self.name != other.name && self.lineage.contains(&other.name)
    }

    /// Whether this is the [`AnyTag`] wildcard
    pub fn is_any(&self) -> bool {
        self.depth == 0
    }
}

impl fmt::Display for TagInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type equality predicate
///
/// `A: SameType<B>` holds exactly when `A` and `B` are the same type.
pub trait SameType<T: ?Sized> {}

impl<T: ?Sized> SameType<T> for T {}

/// Fails to compile unless `A` and `B` are the same type
pub fn assert_same_type<A, B>()
where
    A: SameType<B> + ?Sized,
    B: ?Sized,
{
}

#[doc(hidden)]
pub const fn max_depth(depths: &[usize]) -> usize {
    let mut deepest = 0;
    let mut i = 0;
    while i < depths.len() {
        if depths[i] > deepest {
            deepest = depths[i];
        }
        i += 1;
    }
    deepest
}

#[doc(hidden)]
pub const fn lineage_covers(lineage: &[&str], required: &[&str]) -> bool {
    let mut i = 0;
    while i < required.len() {
        let mut found = false;
        let mut j = 0;
        while j < lineage.len() {
            if str_eq(lineage[j], required[i]) {
                found = true;
            }
            j += 1;
        }
        if !found {
            return false;
        }
        i += 1;
    }
    true
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

#[doc(hidden)]
pub fn assert_refines<T: Refines<U>, U: BackendTag>() {}

// Each listed ancestor must refine the one after it
#[doc(hidden)]
#[macro_export]
macro_rules! __backend_tag_chain {
    ($last:ty) => {};
    ($nearer:ty, $further:ty $(, $rest:ty)*) => {
        const _: fn() = $crate::tag::assert_refines::<$nearer, $further>;
        $crate::__backend_tag_chain!($further $(, $rest)*);
    };
}

/// Declare a backend tag and its place in the hierarchy
///
/// Ancestors must be listed nearest first and transitively closed (every tag
/// the new one refines, except [`AnyTag`], which is implied). They must also
/// form a single chain: each listed ancestor refines the next. Both rules
/// are checked at build time, which keeps the hierarchy a tree, so any set
/// of tags either lies on one chain and joins to its deepest member or has
/// no join at all, whatever the order.
///
/// The macro generates the marker struct, [`BackendTag`], the reflexive
/// [`Join`], the joins with [`AnyTag`] and with every ancestor in both
/// directions, [`Refines`] edges, and the impls that make the tag usable as
/// a stateless execution policy.
///
/// ```rust
/// use dispatch_core::{backend_tag, select::Selected, tag::assert_same_type, AnyTag};
///
/// backend_tag! {
///     pub struct Fpga("fpga");
/// }
///
/// assert_same_type::<Selected<(AnyTag, Fpga)>, Fpga>();
/// ```
///
/// Two ancestors that do not refine each other are rejected:
///
/// ```compile_fail
/// use dispatch_core::{backend_tag, Sequential};
///
/// backend_tag! { struct Left("left") refines Sequential; }
/// backend_tag! { struct Right("right") refines Sequential; }
///
/// // `Left` does not refine `Right`
/// backend_tag! { struct Both("both") refines Left, Right, Sequential; }
/// ```
///
/// So is an ancestor list that leaves out a tag an ancestor refines:
///
/// ```compile_fail
/// use dispatch_core::{backend_tag, Sequential};
///
/// backend_tag! { struct Wide("wide") refines Sequential; }
///
/// // `Wide` refines `Sequential`, which is missing here
/// backend_tag! { struct Wider("wider") refines Wide; }
/// ```
#[macro_export]
macro_rules! backend_tag {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($label:literal) $(refines $($ancestor:ty),+)?;
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::tag::BackendTag for $name {
            const NAME: &'static str = $label;
            const DEPTH: usize = 1 + $crate::tag::max_depth(&[
                $($(<$ancestor as $crate::tag::BackendTag>::DEPTH),+)?
            ]);
            const LINEAGE: &'static [&'static str] = &[
                $label,
                $($(<$ancestor as $crate::tag::BackendTag>::NAME,)+)?
                "any",
            ];
        }

        impl $crate::tag::Join<$name> for $name {
            type Output = $name;
        }

        impl $crate::tag::Join<$crate::tag::AnyTag> for $name {
            type Output = $name;
        }

        impl $crate::tag::Join<$name> for $crate::tag::AnyTag {
            type Output = $name;
        }

        impl $crate::tag::Refines<$crate::tag::AnyTag> for $name {}

        $($(
            impl $crate::tag::Join<$ancestor> for $name {
                type Output = $name;
            }

            impl $crate::tag::Join<$name> for $ancestor {
                type Output = $name;
            }

            impl $crate::tag::Refines<$ancestor> for $name {}

            const _: () = assert!(
                $crate::tag::lineage_covers(
                    <$name as $crate::tag::BackendTag>::LINEAGE,
                    <$ancestor as $crate::tag::BackendTag>::LINEAGE,
                ),
                concat!(
                    "`",
                    stringify!($name),
                    "` must also list every tag its ancestors refine"
                )
            );
        )+)?

        $($crate::__backend_tag_chain!($($ancestor),+);)?

        $crate::execution_policy!($name => $name);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sequential;

    crate::backend_tag! {
        struct Leaf("leaf") refines Sequential;
    }

    crate::backend_tag! {
        struct Island("island");
    }

    #[test]
    fn test_any_tag() {
        let info = AnyTag.info();
        assert_eq!(info.name, "any");
        assert_eq!(info.depth, 0);
        assert!(info.is_any());
        assert_eq!(info.to_string(), "any");
    }

    #[test]
    fn test_generated_constants() {
        assert_eq!(Sequential::NAME, "sequential");
        assert_eq!(Sequential::DEPTH, 1);
        assert_eq!(Sequential::LINEAGE, &["sequential", "any"]);

        assert_eq!(Leaf::DEPTH, 2);
        assert_eq!(Leaf::LINEAGE, &["leaf", "sequential", "any"]);

        assert_eq!(Island::DEPTH, 1);
        assert_eq!(Island::LINEAGE, &["island", "any"]);
    }

    #[test]
    fn test_refinement_edges() {
        assert_refines::<Sequential, AnyTag>();
        assert_refines::<Leaf, Sequential>();
        assert_refines::<Leaf, AnyTag>();
        assert_refines::<Island, AnyTag>();

        let leaf = TagInfo::of::<Leaf>();
        let seq = TagInfo::of::<Sequential>();
        let island = TagInfo::of::<Island>();
        assert!(leaf.refines(&seq));
        assert!(leaf.refines(&AnyTag.info()));
        assert!(!seq.refines(&leaf));
        assert!(!leaf.refines(&leaf));
        assert!(!island.refines(&seq));
        assert!(!seq.refines(&island));
    }

    #[test]
    fn test_join_is_most_specific() {
        assert_same_type::<JoinOf<Leaf, Sequential>, Leaf>();
        assert_same_type::<JoinOf<Sequential, Leaf>, Leaf>();
        assert_same_type::<JoinOf<Leaf, AnyTag>, Leaf>();
        assert_same_type::<JoinOf<AnyTag, Island>, Island>();
        assert_same_type::<JoinOf<Island, Island>, Island>();
        assert_same_type::<JoinOf<AnyTag, AnyTag>, AnyTag>();
    }

    crate::backend_tag! {
        struct Trunk("trunk") refines Leaf, Sequential;
    }

    #[test]
    fn test_chained_ancestors() {
        assert_refines::<Trunk, Leaf>();
        assert_refines::<Trunk, Sequential>();
        assert_eq!(Trunk::DEPTH, 3);
        assert_eq!(Trunk::LINEAGE, &["trunk", "leaf", "sequential", "any"]);
        assert!(TagInfo::of::<Trunk>().refines(&Sequential.info()));
    }

    #[test]
    fn test_lineage_covers() {
        assert!(lineage_covers(Trunk::LINEAGE, Leaf::LINEAGE));
        assert!(lineage_covers(Trunk::LINEAGE, Sequential::LINEAGE));
        assert!(lineage_covers(&["a", "any"], &[]));
        assert!(!lineage_covers(&["trunk", "leaf", "any"], Leaf::LINEAGE));
        assert!(!lineage_covers(Leaf::LINEAGE, Island::LINEAGE));
        assert!(!lineage_covers(&["seq", "any"], &["sequential"]));
    }

    #[test]
    fn test_max_depth() {
        assert_eq!(max_depth(&[]), 0);
        assert_eq!(max_depth(&[1, 3, 2]), 3);
    }
}
