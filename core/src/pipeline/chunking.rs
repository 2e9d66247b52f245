//! Fixed-size chunk planning.

use crate::types::MtcError;

/// One chunk's byte range in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub index: u32,
    pub offset: u64,
    pub len: usize,
}

/// Chunk boundaries for a source of known length.
///
/// Every chunk but the last is exactly `chunk_size` long; the last one holds
/// the remainder (or a full chunk when the length divides evenly). An empty
/// source has no chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    total_len: u64,
    chunk_size: usize,
    count: u32,
}

impl ChunkPlan {
    pub fn new(total_len: u64, chunk_size: usize) -> Result<Self, MtcError> {
        if chunk_size == 0 {
            return Err(MtcError::argument("chunk size must be at least 1 byte"));
        }

        let count = total_len.div_ceil(chunk_size as u64);
        let count = u32::try_from(count).map_err(|_| {
            MtcError::argument(format!(
                "{} bytes in chunks of {} needs {} chunks, container holds at most {}",
                total_len, chunk_size, count, u32::MAX
            ))
        })?;

        Ok(Self { total_len, chunk_size, count })
    }

    pub fn chunk_count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn span(&self, index: u32) -> Option<ChunkSpan> {
        if index >= self.count {
            return None;
        }
        let offset = index as u64 * self.chunk_size as u64;
        let len = (self.total_len - offset).min(self.chunk_size as u64) as usize;
        Some(ChunkSpan { index, offset, len })
    }

    pub fn spans(&self) -> impl Iterator<Item = ChunkSpan> + '_ {
        (0..self.count).filter_map(move |i| self.span(i))
    }
}
