//! compression/codec.rs
//! `ChunkCodec` implementation handed to pool workers.

use crate::compression::decode::decode_into;
use crate::compression::encode::encode_into;
use crate::compression::types::{ChunkCodec, CorruptionError, EncodeStats, LzParams};
use crate::types::MtcError;

/// LZ77 codec bound to a fixed set of parameters. Cheap to copy into tasks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Lz77Codec {
    params: LzParams,
}

impl Lz77Codec {
    pub fn new(params: LzParams) -> Result<Self, MtcError> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl ChunkCodec for Lz77Codec {
    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> EncodeStats {
        encode_into(input, &self.params, out)
    }

    fn decompress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CorruptionError> {
        decode_into(input, out)
    }
}
