//! blockrs
//!
//! Streaming fixed-size block re-chunking for Rust.
//!
//! `blockrs` turns a byte stream arriving in arbitrarily sized pieces into a
//! sequence of blocks of exactly `size` bytes. The final partial block is
//! zero-padded to `size`, or left short when padding is disabled. It is
//! designed for:
//!
//! - tar and other sector-aligned archive writers
//! - block device and tape I/O
//! - fixed-size upload parts
//!
//! Buffered input lives in a temporary file, not in memory, so memory use
//! stays at about one block regardless of how bursty the input is. The file
//! is deleted when the stream finishes, fails, or is dropped.
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use blockrs::{BlockConfig, BlockError, Blocker};
//!
//! fn main() -> Result<(), BlockError> {
//!     let file = File::open("data.bin")?;
//!     let blocker = Blocker::new(BlockConfig::new(512)?)?;
//!
//!     for block in blocker.blocks(file) {
//!         let block = block?;
//!         println!("block @ {} ({} bytes)", block.offset, block.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Push API
//!
//! ```
//! use blockrs::{BlockConfig, Blocker};
//!
//! let mut blocker = Blocker::new(BlockConfig::new(4)?.with_zero_padding(false))?;
//! let mut out = Vec::new();
//! for input in [&b"ab"[..], b"cde", b"f"] {
//!     for block in blocker.push(input)? {
//!         out.push(block?.data);
//!     }
//! }
//! out.extend(blocker.finish()?.map(|b| b.data));
//!
//! assert_eq!(out, vec![&b"abcd"[..], &b"ef"[..]]);
//! # Ok::<(), blockrs::BlockError>(())
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use blockrs::{block_async, BlockConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), blockrs::BlockError> {
//!     let mut stream = block_async(reader, BlockConfig::default())?;
//!
//!     while let Some(block) = stream.next().await {
//!         let block = block?;
//!         println!("block {}", block.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod buffer;
mod config;
mod error;
mod slicer;
mod store;

mod hash; // internal blake3 impl

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use block::{Block, BlockHash};
pub use buffer::BlockBuffer;
pub use config::{BlockConfig, BlockOptions, DEFAULT_BLOCK_SIZE, HashConfig};
pub use error::BlockError;
pub use slicer::{Blocker, Blocks, DEFAULT_READ_SIZE, Drain, State, block_bytes};
pub use store::{BackingStore, TempFileStore};

#[cfg(feature = "async-io")]
pub use async_stream::{BlockStream, Rechunk, block_async, rechunk};
