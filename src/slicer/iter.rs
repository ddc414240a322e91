//! Pull-based blocking of a [`std::io::Read`] source.

use std::io::{self, Read};

use crate::block::Block;
use crate::error::BlockError;
use crate::slicer::Blocker;
use crate::store::BackingStore;

/// Input read size used by [`Blocks`] (8 KiB).
pub const DEFAULT_READ_SIZE: usize = 8 * 1024;

/// An iterator that yields blocks from a reader.
///
/// `Blocks` reads the source incrementally and only reads again once every
/// complete block of the previous read has been yielded. At end of input it
/// yields the final block, then `None`.
///
/// # Example
///
/// ```
/// use blockrs::{BlockConfig, Blocker};
/// use std::io::Cursor;
///
/// let blocker = Blocker::new(BlockConfig::new(4)?)?;
/// let blocks = blocker
///     .blocks(Cursor::new(b"abcdef"))
///     .collect::<Result<Vec<_>, _>>()?;
///
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(&blocks[1].data[..], b"ef\0\0");
/// # Ok::<(), blockrs::BlockError>(())
/// ```
#[derive(Debug)]
pub struct Blocks<R, S: BackingStore> {
    reader: R,
    blocker: Option<Blocker<S>>,
    read_buf: Vec<u8>,
}

impl<S: BackingStore> Blocker<S> {
    /// Turns the session into an iterator over the blocks of `reader`.
    pub fn blocks<R: Read>(self, reader: R) -> Blocks<R, S> {
        Blocks::with_read_size(reader, self, DEFAULT_READ_SIZE)
    }
}

impl<R: Read, S: BackingStore> Blocks<R, S> {
    /// Creates an iterator that reads at most `read_size` bytes at a time.
    pub fn with_read_size(reader: R, blocker: Blocker<S>, read_size: usize) -> Self {
        Self {
            reader,
            blocker: Some(blocker),
            read_buf: vec![0u8; read_size.max(1)],
        }
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read, S: BackingStore> Iterator for Blocks<R, S> {
    type Item = Result<Block, BlockError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let blocker = self.blocker.as_mut()?;

            // Drain what is buffered before reading more
            let buffered = blocker.drain().next();
            if let Some(result) = buffered {
                if result.is_err() {
                    self.blocker = None;
                }
                return Some(result);
            }

            let n = match self.reader.read(&mut self.read_buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // Dropping the session releases the store
                    self.blocker = None;
                    return Some(Err(e.into()));
                }
            };

            if n == 0 {
                let blocker = self.blocker.take()?;
                return blocker.finish().transpose();
            }

            // The next loop turn drains the blocks this push made available
            let pushed = blocker.push(&self.read_buf[..n]).map(|_| ());
            if let Err(e) = pushed {
                self.blocker = None;
                return Some(Err(e));
            }
        }
    }
}
