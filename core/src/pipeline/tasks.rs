//! Units of work submitted to the pool.
//!
//! Each task owns its input, so nothing is shared between workers except the
//! codec, which is read-only.

use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::compression::{ChunkCodec, CorruptionError, EncodeStats};
use crate::container::ChunkRecord;

/// One chunk of raw input, tagged with its position in the plan.
#[derive(Debug, Clone)]
pub struct CompressTask {
    pub index: u32,
    pub bytes: Bytes,
}

#[derive(Debug)]
pub struct CompressedChunk {
    pub index: u32,
    /// Bytes of input the payload encodes.
    pub original_len: u64,
    pub payload: Vec<u8>,
    pub stats: EncodeStats,
    pub elapsed: Duration,
}

impl CompressTask {
    pub fn run(self, codec: &dyn ChunkCodec) -> CompressedChunk {
        let start = Instant::now();
        let mut payload = Vec::with_capacity(self.bytes.len() / 2 + 16);
        let stats = codec.compress_chunk(&self.bytes, &mut payload);
        CompressedChunk {
            index: self.index,
            original_len: self.bytes.len() as u64,
            payload,
            stats,
            elapsed: start.elapsed(),
        }
    }
}

/// One container record waiting to be decoded.
#[derive(Debug)]
pub struct DecompressTask {
    pub record: ChunkRecord,
}

#[derive(Debug)]
pub struct DecompressedChunk {
    pub index: u64,
    /// Original size declared in the record header.
    pub declared_len: u64,
    pub compressed_len: u64,
    pub bytes: Vec<u8>,
    pub elapsed: Duration,
}

impl DecompressTask {
    pub fn run(self, codec: &dyn ChunkCodec) -> Result<DecompressedChunk, CorruptionError> {
        let start = Instant::now();
        let ChunkRecord { index, original_size, payload } = self.record;

        // Declared sizes are untrusted; cap the pre-allocation.
        let hint = usize::try_from(original_size).unwrap_or(usize::MAX).min(payload.len().saturating_mul(64));
        let mut bytes = Vec::with_capacity(hint);
        codec.decompress_chunk(&payload, &mut bytes)?;

        Ok(DecompressedChunk {
            index,
            declared_len: original_size,
            compressed_len: payload.len() as u64,
            bytes,
            elapsed: start.elapsed(),
        })
    }
}
