//! Error types for align-streams.
//!
//! These cover misuse of the block contract only. Alignment anomalies
//! (missing tags, implausible offsets) are absorbed by the aligner and
//! never surface here.

use thiserror::Error;

/// Result type alias using the crate's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for align-streams operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A block was constructed with zero streams.
    #[error("invalid stream count: {0} (need at least one stream)")]
    InvalidStreamCount(usize),

    /// A work context does not carry the number of streams the block expects.
    #[error("stream count mismatch: expected {expected}, got {actual}")]
    StreamCountMismatch {
        /// Streams the block was built for.
        expected: usize,
        /// Streams actually supplied.
        actual: usize,
    },

    /// Input chunks (or output slots) of one invocation differ in length.
    #[error("chunk length mismatch on stream {stream}: expected {expected}, got {actual}")]
    ChunkLengthMismatch {
        /// Offending stream.
        stream: usize,
        /// Common chunk length.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A stream index is out of range.
    #[error("stream index {index} out of range ({count} streams)")]
    StreamIndex {
        /// Requested index.
        index: usize,
        /// Number of streams.
        count: usize,
    },

    /// More samples were consumed than the current chunk holds.
    #[error("stream {stream}: cannot consume {requested} samples, only {available} available")]
    OverConsume {
        /// Offending stream.
        stream: usize,
        /// Total samples requested so far in this invocation.
        requested: usize,
        /// Samples in the chunk.
        available: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
