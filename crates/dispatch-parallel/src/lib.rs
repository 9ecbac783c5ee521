//! Parallel backends for dispatch-core
//!
//! Two backends registered from outside the core crate, through the same
//! public extension points any downstream crate would use:
//!
//! - [`ParallelHost`]: data-parallel on host threads via Rayon. Refines
//!   [`Sequential`](dispatch_core::Sequential), so host cursors of either
//!   kind combine.
//! - [`ParallelDevice`]: block-wise launches on a [`DeviceStream`] over
//!   [`DeviceVec`] buffers. Shares no refinement with the host backends.
//!
//! # Example
//!
//! ```rust
//! use dispatch_core::{transform_binary, transform_with, Selected, AnyTag, assert_same_type};
//! use dispatch_parallel::{par, DeviceStream, DeviceVec, ParallelHost};
//!
//! let a = vec![1, 2, 3, 4];
//! let b = vec![10, 20, 30, 40];
//! let mut out = vec![0; 4];
//!
//! // (parallel-host, parallel-host, any) resolves to parallel-host
//! assert_same_type::<Selected<(ParallelHost, ParallelHost, AnyTag)>, ParallelHost>();
//! transform_binary(par(&a), par(&b), &mut out, |x, y| x + y).unwrap();
//! assert_eq!(out, vec![11, 22, 33, 44]);
//!
//! // Explicit device stream over device buffers
//! let stream = DeviceStream::builder().block_size(2).build().unwrap();
//! let input = DeviceVec::upload(&a);
//! let mut output = DeviceVec::filled(4, 0);
//! transform_with(&stream, &input, &mut output, |x| x * x).unwrap();
//! assert_eq!(output.to_host(), vec![1, 4, 9, 16]);
//! ```

pub mod device;
pub mod host;

pub use device::{DeviceStream, DeviceStreamBuilder, DeviceVec, ParallelDevice, DEFAULT_BLOCK_SIZE};
pub use host::{par, HostPool, ParallelHost};
