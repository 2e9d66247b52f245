//! container/types.rs
//! Container header, record header and format errors.

use std::fmt;

use crate::constants::MAGIC_MTC1;

/// Fixed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: [u8; 4],     // "MTC1"
    pub chunk_count: u32,   // number of records that follow
}

impl ContainerHeader {
    pub const LEN: usize = 4  // magic
        + 4;                  // chunk_count

    pub fn new(chunk_count: u32) -> Self {
        Self { magic: MAGIC_MTC1, chunk_count }
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        if self.magic != MAGIC_MTC1 {
            return Err(FormatError::BadMagic { found: self.magic });
        }
        Ok(())
    }
}

/// Per-chunk record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Chunk length before compression.
    pub original_size: u64,
    /// Token stream bytes following this header.
    pub compressed_size: u64,
}

impl RecordHeader {
    pub const LEN: usize = 8  // original_size
        + 8;                  // compressed_size
}

/// One fully read record, tagged with its position in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    pub index: u64,
    pub original_size: u64,
    pub payload: Vec<u8>,
}

/// Structural problems with the container itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Leading tag is not "MTC1".
    BadMagic { found: [u8; 4] },
    /// Fewer bytes than a container header.
    TruncatedHeader { have: usize, need: usize },
    /// Record header or body cut short.
    TruncatedRecord { index: u64, have: u64, need: u64 },
    /// Data left after the last declared record.
    TrailingBytes { count: u64 },
    /// Writer misuse: records written do not match the declared count.
    RecordCountMismatch { declared: u32, written: u64 },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FormatError::*;
        match self {
            BadMagic { found } =>
                write!(f, "not an MTC1 container (tag {:?})", String::from_utf8_lossy(found)),
            TruncatedHeader { have, need } =>
                write!(f, "truncated container header: {} of {} bytes", have, need),
            TruncatedRecord { index, have, need } =>
                write!(f, "truncated record {}: {} of {} bytes", index, have, need),
            TrailingBytes { count } =>
                write!(f, "{} unexpected bytes after last record", count),
            RecordCountMismatch { declared, written } =>
                write!(f, "header declares {} records, {} written", declared, written),
        }
    }
}

impl std::error::Error for FormatError {}
