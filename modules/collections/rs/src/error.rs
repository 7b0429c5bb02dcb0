//! Error types for run-length compressed sequences.

use thiserror::Error;

/// Failures reported by [`RleSeq`](crate::RleSeq) operations.
///
/// Every operation validates its arguments before touching the runs, so an `Err` always means the
/// sequence was left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An index (or one bound of a range) lies outside `[0, length)`.
    #[error("{name} = {index} is out of range 0..{length}")]
    IndexOutOfRange {
        name: &'static str,
        index: usize,
        length: usize,
    },

    /// Arguments are individually valid but don't form a meaningful request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The configured access policy can't produce the requested value.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// A specialized Result type for sequence operations.
pub type Result<T> = std::result::Result<T, Error>;
