//! Block types.
//!
//! - [`Block`] - One emitted window with data, offset, padding and hash
//! - [`BlockHash`] - 32-byte BLAKE3 hash of a block

mod data;
mod hash;

pub use data::Block;
pub use hash::BlockHash;
