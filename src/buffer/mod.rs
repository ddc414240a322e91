//! Byte accounting over a backing store.
//!
//! [`BlockBuffer`] owns the store and tracks three counters:
//!
//! - `total_written` - bytes ever appended; the next write offset
//! - `position` - offset of the first byte not yet emitted
//! - `buffered` - bytes appended but not yet emitted
//!
//! `position + buffered == total_written` holds after every operation.

mod accounting;

pub use accounting::BlockBuffer;
