//! The Block type - one fixed-size window of the output stream.

use bytes::Bytes;
use std::fmt;

use super::BlockHash;

/// An emitted block with metadata.
///
/// Every block is exactly the configured size, except the final block of a
/// stream when zero padding is disabled. A padded final block records how
/// many trailing zero bytes were added in `padding`.
///
/// # Example
///
/// ```
/// use blockrs::Block;
/// use bytes::Bytes;
///
/// let block = Block {
///     data: Bytes::from_static(b"ef\0\0"),
///     offset: 4,
///     padding: 2,
///     last: true,
///     hash: None,
/// };
///
/// assert_eq!(block.len(), 4);
/// assert_eq!(block.payload(), &b"ef"[..]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The block bytes, padding included.
    pub data: Bytes,

    /// Offset of the first byte in the input stream.
    pub offset: u64,

    /// Number of zero bytes appended to reach the block size.
    ///
    /// Never more than `data.len()`; accessors clamp larger values.
    pub padding: usize,

    /// Whether this is the final block produced at end of stream.
    pub last: bool,

    /// The BLAKE3 hash of `data` (if enabled).
    pub hash: Option<BlockHash>,
}

impl Block {
    /// Creates a full, unpadded, non-final block.
    pub fn new(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
            padding: 0,
            last: false,
            hash: None,
        }
    }

    /// Sets the hash.
    pub fn set_hash(mut self, hash: BlockHash) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Returns the length of the block, padding included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the block has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if this is the final block of the stream.
    pub fn is_final(&self) -> bool {
        self.last
    }

    /// Returns true if zero bytes were added to this block.
    pub fn is_padded(&self) -> bool {
        self.padding > 0
    }

    /// Returns the input bytes carried by this block (padding stripped).
    pub fn payload(&self) -> Bytes {
        self.data.slice(..self.payload_len())
    }

    /// Returns the input range this block covers (padding excluded).
    pub fn range(&self) -> std::ops::Range<u64> {
        self.offset..self.offset + self.payload_len() as u64
    }

    fn payload_len(&self) -> usize {
        self.data.len().saturating_sub(self.padding)
    }

    /// Consumes the block and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl AsRef<[u8]> for Block {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({} bytes @ {}", self.len(), self.offset)?;
        if self.padding > 0 {
            write!(f, ", padding={}", self.padding)?;
        }
        if self.last {
            write!(f, ", final")?;
        }
        if let Some(hash) = self.hash {
            write!(f, ", hash={}", hash)?;
        }
        write!(f, ")")
    }
}
