//! Async streaming support for blocking.
//!
//! This module provides asynchronous re-blocking over runtime-agnostic
//! `futures` traits, compatible with tokio, async-std, smol, and other
//! async runtimes.
//!
//! - [`block_async`] - Stream of blocks from a `futures_io::AsyncRead`
//! - [`rechunk`] - Stream of blocks from a `Stream` of byte chunks
//!
//! Both only pull more input after every complete block of the previous
//! input has been yielded, so a slow consumer slows the producer down.
//!
//! This module requires the `async-io` feature to be enabled.

mod chunks;
mod reader;

pub use chunks::{Rechunk, rechunk};
pub use reader::{BlockStream, block_async};
