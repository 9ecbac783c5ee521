//! Compile-time execution backend selection for generic algorithms
//!
//! This crate lets one algorithm call site run on one of several
//! interchangeable backends, chosen from the *types* of its arguments with
//! no runtime branching and no indirection.
//!
//! # Architecture Overview
//!
//! 1. **Tags** ([`tag`]) - zero-sized backend markers in a refinement order
//! 2. **Extraction** ([`cursor`]) - each argument's tag, read from its type
//! 3. **Resolution** ([`select`]) - the join of all argument tags
//! 4. **Policies** ([`policy`]) - explicit overrides, normalized to a bare policy
//! 5. **Front end** ([`transform`]) - the public algorithms, which forward
//!    to the implementation registered for the selected backend ([`system`])
//!
//! # Design Philosophy
//!
//! - **Zero-Cost**: every decision is made during monomorphization
//! - **Static failure**: ambiguous tags, missing implementations and
//!   malformed policies are build errors, never runtime ones
//! - **Open**: new backends are added from other crates through
//!   [`backend_tag!`] and the traits in [`system::traits`]
//!
//! # Example
//!
//! ```rust
//! use dispatch_core::{seq, transform_binary, transform_if_with, AnyTag, Sequential};
//!
//! let a = vec![1.0, 2.0, 3.0];
//! let b = vec![0.5, 0.5, 0.5];
//! let mut out = vec![0.0; 3];
//!
//! // (sequential, any, any) resolves to sequential
//! transform_binary(seq(&a), &b, &mut out, |x, y| x * y).unwrap();
//! assert_eq!(out, vec![0.5, 1.0, 1.5]);
//!
//! // An explicit policy wins over whatever the cursors say
//! transform_if_with(AnyTag, seq(&a), &mut out, |x| x * 10.0, |x| *x > 1.5).unwrap();
//! assert_eq!(out, vec![0.5, 20.0, 30.0]);
//! ```

pub mod cursor;
pub mod error;
pub mod policy;
pub mod select;
pub mod system;
pub mod tag;
pub mod transform;

// Re-export core types
pub use error::{ensure_len, Error, Result};

pub use tag::{assert_same_type, AnyTag, BackendTag, Join, JoinOf, Refines, SameType, TagInfo};

pub use cursor::{seq, tag_of, HasBackendTag, InputSequence, OutputSequence, Tagged};

pub use select::{select_system, SelectSystem, Selected};

pub use policy::{normalize, ExecutionPolicy, Normalize, PolicyBase};

pub use system::{
    BinaryTransform, BinaryTransformIf, DefaultSystem, Sequential, Transform, TransformIf,
    TransformIfStencil,
};

pub use transform::{
    transform, transform_binary, transform_binary_if, transform_binary_if_with,
    transform_binary_with, transform_if, transform_if_stencil, transform_if_stencil_with,
    transform_if_with, transform_with,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        // Front end
        transform, transform_binary, transform_binary_if, transform_binary_if_with,
        transform_binary_with, transform_if, transform_if_stencil, transform_if_stencil_with,
        transform_if_with, transform_with,
        // Tags and policies
        seq, AnyTag, BackendTag, ExecutionPolicy, Normalize, PolicyBase, Sequential, Tagged,
        Result,
    };

    pub use crate::error::Error;
}
