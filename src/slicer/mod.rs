//! Block slicing over buffered input.
//!
//! - [`Blocker`] - Stateful session with `push()`/`finish()` API
//! - [`Drain`] - Lazy iterator over the complete blocks of one push
//! - [`Blocks`] - Pull iterator over a [`std::io::Read`] source

mod engine;
mod iter;

pub use engine::{Blocker, Drain, State, block_bytes};
pub use iter::{Blocks, DEFAULT_READ_SIZE};
