//! Error types for blockrs.

use thiserror::Error;

/// Errors that can occur while re-blocking a stream.
///
/// Every error is terminal for the [`Blocker`](crate::Blocker) session that
/// produced it: the backing store is released and further calls return
/// [`BlockError::Terminated`].
#[derive(Debug, Error)]
pub enum BlockError {
    /// An I/O error occurred against the backing store (create, write, read or delete).
    #[error("backing store io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store returned fewer bytes than the accounting promised.
    ///
    /// This means the buffered data is no longer faithfully available, so it
    /// is never retried and never padded over.
    #[error("short read at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Absolute offset the read started at.
        offset: u64,
        /// Number of bytes the accounting says are stored there.
        expected: usize,
        /// Number of bytes actually read.
        actual: usize,
    },

    /// `push` or `finish` was called while a complete block was still buffered.
    #[error("{pending} bytes still buffered (block size {size}); drain first")]
    Undrained {
        /// Bytes left in the buffer.
        pending: u64,
        /// Configured block size.
        size: usize,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The session already failed or finished and cannot accept more calls.
    #[error("block session terminated by an earlier error")]
    Terminated,
}

impl BlockError {
    /// Returns true for errors that indicate the stored data is not trustworthy.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, BlockError::ShortRead { .. })
    }
}
