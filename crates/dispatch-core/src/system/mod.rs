//! Backends shipped with the core and the interface every backend implements
//!
//! # Architecture
//!
//! - One trait per operation in [`traits`], implemented on policy types
//! - [`Sequential`]: in-order loops on the calling thread
//! - [`AnyTag`](crate::AnyTag): forwards to [`DefaultSystem`]
//!
//! Other backends live in their own crates and register the same way.

mod any;
mod sequential;
pub mod traits;

pub use any::DefaultSystem;
pub use sequential::Sequential;
pub use traits::{BinaryTransform, BinaryTransformIf, Transform, TransformIf, TransformIfStencil};
