//! Core blocking engine - Blocker with streaming API.
//!
//! This module implements the fixed-size slicing state machine:
//!
//! - [`Blocker`] - Stateful session that owns the buffered input
//! - `push()` - Append input of any size, returns a [`Drain`] of complete blocks
//! - `finish()` - Emit the final (padded or short) block and release the store
//!
//! # Example
//!
//! ```
//! use blockrs::{BlockConfig, Blocker};
//!
//! let mut blocker = Blocker::new(BlockConfig::new(4)?)?;
//!
//! let mut blocks = Vec::new();
//! for input in [&b"ab"[..], b"cde", b"f"] {
//!     for block in blocker.push(input)? {
//!         blocks.push(block?);
//!     }
//! }
//! blocks.extend(blocker.finish()?);
//!
//! assert_eq!(&blocks[0].data[..], b"abcd");
//! assert_eq!(&blocks[1].data[..], b"ef\0\0");
//! # Ok::<(), blockrs::BlockError>(())
//! ```

use log::{debug, error, trace};

use crate::block::Block;
use crate::buffer::BlockBuffer;
use crate::config::BlockConfig;
use crate::error::BlockError;
use crate::hash::hash_block;
use crate::store::{BackingStore, TempFileStore};

/// Session state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Fewer than `size` bytes are buffered; ready for the next chunk.
    AwaitingInput,
    /// At least one complete block may still be buffered.
    Draining,
    /// An error occurred; the store is released and the session is dead.
    Terminated,
}

/// A session that re-blocks a byte stream into fixed-size blocks.
///
/// `Blocker` accepts input via [`push`](Self::push) and hands complete
/// blocks out through the returned [`Drain`]. Because the drain borrows the
/// session mutably, no new input can be pushed until the caller is done with
/// the blocks of the previous one. This is the backpressure contract.
///
/// # Invariants
///
/// - Every block except the final one is exactly `config.size()` bytes
/// - Blocks are emitted in input order, with contiguous offsets
/// - The backing store is released exactly once, on `finish`, on the first
///   error, or on drop
///
/// # Errors
///
/// Any store error or short read terminates the session: the store is
/// released and every later call returns [`BlockError::Terminated`].
#[derive(Debug)]
pub struct Blocker<S: BackingStore = TempFileStore> {
    buffer: BlockBuffer<S>,
    config: BlockConfig,
    state: State,
}

impl Blocker<TempFileStore> {
    /// Creates a session backed by a fresh temporary file.
    ///
    /// # Example
    ///
    /// ```
    /// use blockrs::{BlockConfig, Blocker};
    ///
    /// let blocker = Blocker::new(BlockConfig::default())?;
    /// assert_eq!(blocker.buffered(), 0);
    /// # Ok::<(), blockrs::BlockError>(())
    /// ```
    pub fn new(config: BlockConfig) -> Result<Self, BlockError> {
        Self::with_store(config, TempFileStore::new()?)
    }
}

impl<S: BackingStore> Blocker<S> {
    /// Creates a session over a caller-supplied store.
    ///
    /// The store must be empty; the session takes exclusive ownership.
    pub fn with_store(config: BlockConfig, store: S) -> Result<Self, BlockError> {
        config.validate()?;
        debug!(
            "block session opened (size={}, zero_padding={})",
            config.size(),
            config.zero_padding()
        );

        Ok(Self {
            buffer: BlockBuffer::new(store),
            config,
            state: State::AwaitingInput,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Bytes buffered but not yet emitted.
    pub fn buffered(&self) -> u64 {
        self.buffer.buffered()
    }

    /// Offset of the first byte not yet emitted.
    pub fn position(&self) -> u64 {
        self.buffer.position()
    }

    /// Total bytes pushed so far.
    pub fn total_written(&self) -> u64 {
        self.buffer.total_written()
    }

    /// Appends `chunk` and returns the complete blocks it made available.
    ///
    /// The returned [`Drain`] is lazy: each `next()` reads one block from the
    /// store. Blocks not taken before the drain is dropped stay buffered; take
    /// them with [`drain`](Self::drain) before pushing again.
    ///
    /// Fails with [`BlockError::Undrained`] if a complete block is still
    /// buffered. The session stays usable.
    ///
    /// # Example
    ///
    /// ```
    /// use blockrs::{BlockConfig, Blocker};
    ///
    /// let mut blocker = Blocker::new(BlockConfig::new(3)?)?;
    /// let blocks: Vec<_> = blocker.push(b"abcdefghi")?.collect::<Result<_, _>>()?;
    ///
    /// assert_eq!(blocks.len(), 3);
    /// assert_eq!(&blocks[2].data[..], b"ghi");
    /// assert!(blocker.finish()?.is_none());
    /// # Ok::<(), blockrs::BlockError>(())
    /// ```
    pub fn push(&mut self, chunk: &[u8]) -> Result<Drain<'_, S>, BlockError> {
        self.ensure_open()?;
        self.ensure_drained()?;

        if let Err(e) = self.buffer.append(chunk) {
            return Err(self.fail(e));
        }
        self.state = State::Draining;
        Ok(Drain { blocker: self })
    }

    /// Returns a drain over blocks already buffered, without new input.
    pub fn drain(&mut self) -> Drain<'_, S> {
        Drain { blocker: self }
    }

    /// Ends the stream.
    ///
    /// Returns the final block, zero-padded to `size` when padding is enabled
    /// or exactly the leftover bytes otherwise. Returns `None` if nothing is
    /// buffered. The backing store is released in every case.
    ///
    /// Fails if complete blocks are still buffered because a [`Drain`] was
    /// dropped before it was exhausted.
    pub fn finish(mut self) -> Result<Option<Block>, BlockError> {
        self.ensure_open()?;

        if let Err(e) = self.ensure_drained() {
            return Err(self.fail(e));
        }

        let pad_to = self.config.zero_padding().then_some(self.config.size());
        let tail = match self.buffer.take_tail(pad_to) {
            Ok(tail) => tail,
            Err(e) => return Err(self.fail(e)),
        };

        if let Err(e) = self.buffer.release() {
            return Err(self.fail(e));
        }
        debug!(
            "block session finished ({} bytes total)",
            self.buffer.total_written()
        );

        Ok(tail.map(|(offset, data, padding)| {
            let hash = hash_block(self.config.hash_config(), &data);
            Block {
                data,
                offset,
                padding,
                last: true,
                hash,
            }
        }))
    }

    /// Abandons the stream and releases the store without emitting anything.
    pub fn abort(mut self) -> Result<(), BlockError> {
        self.state = State::Terminated;
        debug!(
            "block session aborted with {} bytes buffered",
            self.buffer.buffered()
        );
        self.buffer.release()
    }

    fn ensure_open(&self) -> Result<(), BlockError> {
        if self.state == State::Terminated {
            return Err(BlockError::Terminated);
        }
        Ok(())
    }

    fn ensure_drained(&self) -> Result<(), BlockError> {
        let pending = self.buffer.buffered();
        let size = self.config.size();
        if pending >= size as u64 {
            return Err(BlockError::Undrained { pending, size });
        }
        Ok(())
    }

    /// Poisons the session and releases the store, passing `err` through.
    fn fail(&mut self, err: BlockError) -> BlockError {
        error!("block session terminated: {}", err);
        self.state = State::Terminated;
        if let Err(release_err) = self.buffer.release() {
            error!("failed to release backing store: {}", release_err);
        }
        err
    }

    fn next_block(&mut self) -> Option<Result<Block, BlockError>> {
        if self.state == State::Terminated {
            return None;
        }

        let size = self.config.size();
        match self.buffer.take_window(size) {
            Ok(Some((offset, data))) => {
                trace!("emitting block @ {} ({} bytes)", offset, size);
                let hash = hash_block(self.config.hash_config(), &data);
                Some(Ok(Block {
                    data,
                    offset,
                    padding: 0,
                    last: false,
                    hash,
                }))
            }
            Ok(None) => {
                self.state = State::AwaitingInput;
                None
            }
            Err(e) => Some(Err(self.fail(e))),
        }
    }
}

/// Lazy iterator over the complete blocks currently buffered.
///
/// Yields `Ok(block)` until fewer than `size` bytes remain, then `None`. On
/// a store failure it yields one `Err` and the session is terminated.
#[must_use = "blocks stay buffered until the drain is iterated"]
#[derive(Debug)]
pub struct Drain<'a, S: BackingStore> {
    blocker: &'a mut Blocker<S>,
}

impl<S: BackingStore> Drain<'_, S> {
    /// Bytes still buffered in the session.
    pub fn buffered(&self) -> u64 {
        self.blocker.buffered()
    }
}

impl<S: BackingStore> Iterator for Drain<'_, S> {
    type Item = Result<Block, BlockError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocker.next_block()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.blocker.state == State::Terminated {
            return (0, Some(0));
        }
        let n = (self.blocker.buffered() / self.blocker.config.size() as u64) as usize;
        (0, Some(n))
    }
}

/// Re-blocks an in-memory buffer in one call.
///
/// Convenience wrapper around [`Blocker`] for data already in memory; the
/// bytes still go through a temporary file.
///
/// # Example
///
/// ```
/// use blockrs::{block_bytes, BlockConfig};
///
/// let config = BlockConfig::new(4)?.with_zero_padding(false);
/// let blocks = block_bytes(config, b"abcdef")?;
///
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(&blocks[1].data[..], b"ef");
/// # Ok::<(), blockrs::BlockError>(())
/// ```
pub fn block_bytes(config: BlockConfig, data: impl AsRef<[u8]>) -> Result<Vec<Block>, BlockError> {
    let mut blocker = Blocker::new(config)?;
    let mut blocks = blocker.push(data.as_ref())?.collect::<Result<Vec<_>, _>>()?;
    blocks.extend(blocker.finish()?);
    Ok(blocks)
}
