//! Compile-time execution backend selection for generic algorithms
//!
//! Facade over the workspace crates:
//!
//! - [`dispatch_core`]: backend tags, resolution, policies, the sequential
//!   backend and the generic `transform` family
//! - `dispatch_parallel` (feature `parallel`, on by default): the
//!   multi-threaded host and stream-based device backends
//!
//! # Example
//!
//! ```rust
//! use backend_dispatch::prelude::*;
//!
//! let a = vec![1, 2, 3];
//! let b = vec![4, 5, 6];
//! let mut out = vec![0; 3];
//!
//! transform_binary(par(&a), par(&b), &mut out, |x, y| x * y).unwrap();
//! assert_eq!(out, vec![4, 10, 18]);
//! ```

pub use dispatch_core::*;

#[cfg(feature = "parallel")]
pub use dispatch_parallel::{
    par, DeviceStream, DeviceStreamBuilder, DeviceVec, HostPool, ParallelDevice, ParallelHost,
    DEFAULT_BLOCK_SIZE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use dispatch_core::prelude::*;

    #[cfg(feature = "parallel")]
    pub use dispatch_parallel::{par, DeviceStream, DeviceVec, HostPool, ParallelDevice, ParallelHost};
}
