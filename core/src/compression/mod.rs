//! compression/mod.rs
//! Byte-aligned LZ77 codec over a bounded sliding window.
//!
//! Notes:
//! - Every chunk is encoded in isolation; no state survives between calls.
//! - Encoding is deterministic for a given input and `LzParams`.
//! - Decoding never trusts the stream: flags, payload lengths and
//!   back-reference offsets are all checked before use.

pub mod constants;
pub mod types;
pub mod encode;
pub mod decode;
pub mod codec;

pub use constants::*;
pub use types::*;
pub use encode::*;
pub use decode::*;
pub use codec::*;
