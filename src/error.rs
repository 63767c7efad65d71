//! Crate-wide error type.
//!
//! Precondition violations a caller can trigger (dimension mismatches,
//! invalid hash or scheduler configuration) surface as a typed [`Error`]
//! rather than a panic. Internal invariants the crate itself guarantees
//! (index bounds on data it allocated) remain plain indexing panics.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("invalid hash configuration: {0}")]
    InvalidHashConfig(String),

    #[error("invalid scheduler configuration: {0}")]
    InvalidSchedulerConfig(String),

    #[error("network has no layers")]
    EmptyNetwork,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
