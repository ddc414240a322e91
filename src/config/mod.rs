//! Configuration for block re-chunking.
//!
//! This module provides types to configure how a stream is re-blocked:
//!
//! - [`BlockConfig`] - Validated block size, padding policy and hashing
//! - [`BlockOptions`] - Loose option form (`size`, `nopad`, `zero_padding`)
//! - [`HashConfig`] - Specifies whether to hash emitted blocks
//!
//! # Example
//!
//! ```
//! use blockrs::{BlockConfig, BlockOptions};
//!
//! // Explicit block size
//! let config = BlockConfig::new(4096)?.with_zero_padding(false);
//! assert_eq!(config.size(), 4096);
//!
//! // Option form: unset size falls back to 512, `nopad` disables padding
//! let config = BlockOptions::new().nopad(true).into_config()?;
//! assert_eq!(config.size(), 512);
//! assert!(!config.zero_padding());
//! # Ok::<(), blockrs::BlockError>(())
//! ```

use crate::error::BlockError;

/// Default block size (512 bytes, one tar/disk sector).
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Configuration for a block session.
///
/// `BlockConfig` is immutable for the lifetime of a [`Blocker`](crate::Blocker):
///
/// - `size` - Length in bytes of every emitted block except possibly the last
/// - `zero_padding` - Whether the trailing partial block is padded with zeros to `size`
/// - `hash_config` - Whether emitted blocks carry a BLAKE3 hash
///
/// # Example
///
/// ```
/// use blockrs::{BlockConfig, HashConfig};
///
/// let config = BlockConfig::default()
///     .with_size(1024)
///     .with_hash_config(HashConfig::enabled());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockConfig {
    /// Block size in bytes.
    size: usize,

    /// Pad the final partial block with zeros.
    zero_padding: bool,

    /// Configuration for hashing behavior.
    hash_config: HashConfig,
}

impl BlockConfig {
    /// Creates a new configuration with zero padding enabled.
    ///
    /// Returns error if `size` is zero.
    pub fn new(size: usize) -> Result<Self, BlockError> {
        if size == 0 {
            return Err(BlockError::InvalidConfig {
                message: "block size must be non-zero",
            });
        }

        Ok(Self {
            size,
            zero_padding: true,
            hash_config: HashConfig::default(),
        })
    }

    /// Sets the block size. Call [`validate`](Self::validate) afterwards.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets whether the final partial block is zero-padded.
    pub fn with_zero_padding(mut self, zero_padding: bool) -> Self {
        self.zero_padding = zero_padding;
        self
    }

    /// Sets the hash configuration.
    pub fn with_hash_config(mut self, config: HashConfig) -> Self {
        self.hash_config = config;
        self
    }

    /// Returns the block size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether the final partial block is zero-padded.
    pub fn zero_padding(&self) -> bool {
        self.zero_padding
    }

    /// Returns the hash configuration.
    pub fn hash_config(&self) -> &HashConfig {
        &self.hash_config
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), BlockError> {
        Self::new(self.size).map(|_| ())
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BLOCK_SIZE,
            zero_padding: true,
            hash_config: HashConfig::default(),
        }
    }
}

/// Loose construction options, resolved into a [`BlockConfig`].
///
/// Resolution rules:
/// - `size` unset or `0` falls back to [`DEFAULT_BLOCK_SIZE`]
/// - `nopad = true` forces padding off, whatever `zero_padding` says
/// - otherwise `zero_padding` defaults to `true`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockOptions {
    /// Target block size in bytes.
    pub size: Option<usize>,
    /// Disable zero padding of the final block.
    pub nopad: bool,
    /// Explicit padding choice, overridden by `nopad`.
    pub zero_padding: Option<bool>,
}

impl BlockOptions {
    /// Creates empty options (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block size.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets `nopad`.
    pub fn nopad(mut self, nopad: bool) -> Self {
        self.nopad = nopad;
        self
    }

    /// Sets the explicit padding choice.
    pub fn zero_padding(mut self, zero_padding: bool) -> Self {
        self.zero_padding = Some(zero_padding);
        self
    }

    /// Resolves the options into a validated [`BlockConfig`].
    pub fn into_config(self) -> Result<BlockConfig, BlockError> {
        let size = match self.size {
            Some(0) | None => DEFAULT_BLOCK_SIZE,
            Some(size) => size,
        };
        let zero_padding = if self.nopad {
            false
        } else {
            self.zero_padding.unwrap_or(true)
        };

        Ok(BlockConfig::new(size)?.with_zero_padding(zero_padding))
    }
}

impl TryFrom<BlockOptions> for BlockConfig {
    type Error = BlockError;

    fn try_from(options: BlockOptions) -> Result<Self, Self::Error> {
        options.into_config()
    }
}

/// Configuration for block hashing.
///
/// Controls whether BLAKE3 hashes are computed for each emitted block.
/// Disabled by default: the block bytes themselves are the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HashConfig {
    /// Whether to compute BLAKE3 hashes.
    pub enabled: bool,
}

impl HashConfig {
    /// Creates a new hash configuration.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enables hashing.
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Disables hashing.
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }
}
