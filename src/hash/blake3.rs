//! BLAKE3-based block hashing.

use crate::block::BlockHash;

/// One-shot BLAKE3 hasher for block contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl Blake3Hasher {
    /// Hashes `data` in one shot.
    pub fn hash(data: &[u8]) -> BlockHash {
        BlockHash::new(blake3::hash(data).into())
    }
}
