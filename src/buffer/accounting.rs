//! Append/read accounting for buffered input.

use bytes::Bytes;
use log::{trace, warn};

use crate::error::BlockError;
use crate::store::BackingStore;

/// Input buffered in a [`BackingStore`], addressed by absolute offset.
///
/// Holds at most one window in memory at a time; everything else lives in
/// the store. The store is released exactly once, by [`release`](Self::release)
/// or on drop.
#[derive(Debug)]
pub struct BlockBuffer<S: BackingStore> {
    store: S,
    total_written: u64,
    position: u64,
    buffered: u64,
    released: bool,
}

impl<S: BackingStore> BlockBuffer<S> {
    /// Wraps an empty store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            total_written: 0,
            position: 0,
            buffered: 0,
            released: false,
        }
    }

    /// Total bytes ever appended.
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Offset of the first unconsumed byte.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes appended but not yet sliced off.
    pub fn buffered(&self) -> u64 {
        self.buffered
    }

    /// Returns true once the store has been released.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends `chunk` at the end of everything written so far.
    ///
    /// The write offset is `total_written`, never `buffered`: the two diverge
    /// after the first window is sliced.
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), BlockError> {
        if chunk.is_empty() {
            return Ok(());
        }

        self.store.write_at(self.total_written, chunk)?;
        self.total_written += chunk.len() as u64;
        self.buffered += chunk.len() as u64;

        trace!(
            "appended {} bytes (buffered={}, total={})",
            chunk.len(),
            self.buffered,
            self.total_written
        );
        debug_assert_eq!(self.position + self.buffered, self.total_written);
        Ok(())
    }

    /// Reads exactly `length` bytes starting at `offset`.
    ///
    /// Fails with [`BlockError::ShortRead`] if the store holds fewer bytes
    /// there than requested.
    pub fn read_window(&mut self, offset: u64, length: usize) -> Result<Bytes, BlockError> {
        let mut buf = vec![0u8; length];
        self.read_exact_at(offset, &mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Slices the next full window of `size` bytes, if one is buffered.
    ///
    /// Returns the window's start offset and bytes. Accounting only advances
    /// after the read succeeds.
    pub fn take_window(&mut self, size: usize) -> Result<Option<(u64, Bytes)>, BlockError> {
        if self.buffered < size as u64 {
            return Ok(None);
        }

        let offset = self.position;
        let data = self.read_window(offset, size)?;
        self.position += size as u64;
        self.buffered -= size as u64;

        debug_assert_eq!(self.position + self.buffered, self.total_written);
        Ok(Some((offset, data)))
    }

    /// Slices everything still buffered as one final window.
    ///
    /// With `pad_to = Some(size)` the window is zero-filled up to `size`
    /// bytes. Returns the start offset, the bytes, and the number of padding
    /// bytes, or `None` if nothing is buffered.
    pub fn take_tail(
        &mut self,
        pad_to: Option<usize>,
    ) -> Result<Option<(u64, Bytes, usize)>, BlockError> {
        if self.buffered == 0 {
            return Ok(None);
        }

        let len = self.buffered as usize;
        let mut buf = vec![0u8; pad_to.unwrap_or(len).max(len)];
        let offset = self.position;
        self.read_exact_at(offset, &mut buf[..len])?;

        self.position += len as u64;
        self.buffered = 0;

        let padding = buf.len() - len;
        Ok(Some((offset, Bytes::from(buf), padding)))
    }

    /// Deletes the backing store. Safe to call more than once.
    pub fn release(&mut self) -> Result<(), BlockError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.store.release()?;
        Ok(())
    }

    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.store.read_at(offset + filled as u64, &mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled != buf.len() {
            return Err(BlockError::ShortRead {
                offset,
                expected: buf.len(),
                actual: filled,
            });
        }
        Ok(())
    }
}

impl<S: BackingStore> Drop for BlockBuffer<S> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("failed to release backing store on drop: {}", e);
        }
    }
}
