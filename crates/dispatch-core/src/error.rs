//! Error types for backend execution
//!
//! Backend selection itself never fails at runtime: ambiguous tags, missing
//! implementations and malformed policies are rejected by the compiler. The
//! errors here are raised by a backend *while executing* a call that was
//! already dispatched.

use thiserror::Error;

/// Core error type for dispatched algorithm execution
#[derive(Error, Debug)]
pub enum Error {
    /// A secondary operand is shorter than the primary input
    #[error("Size mismatch: {operand} has {actual} elements, expected at least {expected}")]
    SizeMismatch {
        operand: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid parameter provided when configuring a policy
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Threading or worker pool error
    #[error("Execution error: {0}")]
    Execution(String),

    /// Errors surfaced by externally registered backends
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a too-short operand
    pub fn size_mismatch(operand: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            operand,
            expected,
            actual,
        }
    }
}

/// Check that `operand` holds at least `expected` elements.
pub fn ensure_len(operand: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        return Err(Error::size_mismatch(operand, expected, actual));
    }
    Ok(())
}
