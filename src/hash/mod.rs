//! Strong hashing of emitted blocks.
//!
//! - [`Blake3Hasher`] - BLAKE3 hash implementation (requires `hash-blake3` feature)

#[cfg(feature = "hash-blake3")]
mod blake3;

#[cfg(feature = "hash-blake3")]
pub use blake3::Blake3Hasher;

use crate::block::BlockHash;
use crate::config::HashConfig;

/// Hashes a block's bytes if hashing is enabled and compiled in.
pub(crate) fn hash_block(config: &HashConfig, data: &[u8]) -> Option<BlockHash> {
    if !config.enabled {
        return None;
    }
    #[cfg(feature = "hash-blake3")]
    return Some(Blake3Hasher::hash(data));
    #[cfg(not(feature = "hash-blake3"))]
    {
        let _ = data;
        None
    }
}
