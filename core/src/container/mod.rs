//! container/mod.rs
//! MTC1 container: the on-disk layout tying compressed chunks together.
//!
//! Layout notes:
//! - Fixed 8-byte header (magic + chunk count) followed by one record per
//!   chunk, in chunk index order. Record order is the only ordering
//!   information; no offsets are stored.
//! - All header and record integers are little-endian.
//! - A record is a 16-byte header (original size, compressed size) and the
//!   compressed token stream.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
