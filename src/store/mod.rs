//! Offset-addressable backing stores for buffered input.
//!
//! - [`BackingStore`] - Capability trait the buffer accounting is generic over
//! - [`TempFileStore`] - Temporary file, deleted on release or drop

mod temp;

pub use temp::TempFileStore;

use std::io;

/// A byte-addressable resource that holds input between receipt and emission.
///
/// Callers guarantee writes are sequential and non-overlapping, and that no
/// two operations run concurrently (`&mut self`).
pub trait BackingStore {
    /// Writes all of `data` starting at `offset`.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()>;

    /// Reads up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes read; `0` means nothing is stored there.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Deletes the resource. Must be idempotent.
    fn release(&mut self) -> io::Result<()>;
}

/// Error returned by a store used after [`BackingStore::release`].
pub(crate) fn released_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "backing store already released")
}
