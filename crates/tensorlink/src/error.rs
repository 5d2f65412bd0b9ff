//! Typed decode failures surfaced by fetch reconstruction.

use thiserror::Error;

use crate::buffer::DType;

/// Fatal disagreements between a returned buffer and the statically expected
/// fetch type.
///
/// Neither variant is retried: both indicate a logic error upstream (context
/// misuse or a graph/engine version mismatch) rather than a transient
/// condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The buffer declares a different element type than the fetch expects.
    #[error("buffer declares element type {actual} but the fetch expects {expected}")]
    DtypeMismatch { expected: DType, actual: DType },
    /// A scalar fetch ran over a buffer holding a different element count.
    #[error("scalar fetch requires exactly one element, buffer holds {actual}")]
    ScalarCount { actual: usize },
}
