//! compression/types.rs
//! Token model, codec parameters and codec errors.
use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use num_enum::TryFromPrimitive;

use crate::compression::constants::{token_flags, LITERAL_TOKEN_LEN, MATCH_TOKEN_LEN};
use crate::constants::{
    DEFAULT_MAX_MATCH_LEN, DEFAULT_WINDOW_SIZE, MAX_MATCH_LEN, MAX_WINDOW_SIZE, MIN_MATCH_LEN,
};
use crate::types::MtcError;
use crate::utils::enum_name_or_hex;

/// Wire flag preceding every token.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum TokenFlag {
    Literal = token_flags::LITERAL,
    Match   = token_flags::MATCH,
}

impl TokenFlag {
    /// Bytes that must follow the flag byte.
    #[inline(always)]
    pub const fn payload_len(self) -> usize {
        match self {
            TokenFlag::Literal => LITERAL_TOKEN_LEN - 1,
            TokenFlag::Match   => MATCH_TOKEN_LEN - 1,
        }
    }
}

/// One instruction of the compressed stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A raw byte copied to the output.
    Literal(u8),
    /// Copy `length` bytes starting `offset` bytes behind the output end.
    /// The source may overlap the bytes being produced.
    Match { offset: u16, length: u8 },
}

impl Token {
    pub const fn flag(&self) -> TokenFlag {
        match self {
            Token::Literal(_) => TokenFlag::Literal,
            Token::Match { .. } => TokenFlag::Match,
        }
    }

    /// Append the canonical encoding. Offsets are big-endian.
    #[inline]
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.flag() as u8);
        match *self {
            Token::Literal(b) => out.push(b),
            Token::Match { offset, length } => {
                let mut off = [0u8; 2];
                BigEndian::write_u16(&mut off, offset);
                out.extend_from_slice(&off);
                out.push(length);
            }
        }
    }
}

/// Encoder parameters. Neither value is stored in the container; the decoder
/// does not need them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LzParams {
    /// Maximum back-reference distance (1..=65535).
    pub window_size: usize,
    /// Maximum copy length per match token (3..=255).
    pub max_match_len: usize,
}

impl Default for LzParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            max_match_len: DEFAULT_MAX_MATCH_LEN,
        }
    }
}

impl LzParams {
    pub fn new(window_size: usize, max_match_len: usize) -> Result<Self, MtcError> {
        let params = Self { window_size, max_match_len };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), MtcError> {
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(MtcError::argument(format!(
                "window size {} out of range 1..={}",
                self.window_size, MAX_WINDOW_SIZE
            )));
        }
        if self.max_match_len < MIN_MATCH_LEN || self.max_match_len > MAX_MATCH_LEN {
            return Err(MtcError::argument(format!(
                "max match length {} out of range {}..={}",
                self.max_match_len, MIN_MATCH_LEN, MAX_MATCH_LEN
            )));
        }
        Ok(())
    }
}

/// Token counts produced while encoding one buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub literals: u64,
    pub matches: u64,
}

impl std::ops::AddAssign for EncodeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.literals += rhs.literals;
        self.matches  += rhs.matches;
    }
}

/// The compressed data cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptionError {
    /// The stream ended before the flag's payload was complete.
    TruncatedToken { flag: u8, position: usize, needed: usize, available: usize },
    /// Flag byte is neither literal nor match.
    UnknownFlag { flag: u8, position: usize },
    /// Back-reference pointing at offset 0 or before the start of the output.
    InvalidOffset { offset: u16, decoded: usize, position: usize },
    /// Decoded chunk length disagrees with the length declared in its record.
    SizeMismatch { chunk_index: u64, expected: u64, actual: u64 },
}

impl fmt::Display for CorruptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CorruptionError::*;
        match self {
            TruncatedToken { flag, position, needed, available } => write!(
                f,
                "truncated {} token at byte {}: needs {} payload bytes, {} left",
                enum_name_or_hex::<TokenFlag>(*flag), position, needed, available
            ),
            UnknownFlag { flag, position } =>
                write!(f, "unknown token flag 0x{:02x} at byte {}", flag, position),
            InvalidOffset { offset, decoded, position } => write!(
                f,
                "invalid match offset {} at byte {} ({} bytes decoded so far)",
                offset, position, decoded
            ),
            SizeMismatch { chunk_index, expected, actual } => write!(
                f,
                "chunk {} decoded to {} bytes, record declares {}",
                chunk_index, actual, expected
            ),
        }
    }
}

impl std::error::Error for CorruptionError {}

/// Per-chunk codec seam used by pool workers.
pub trait ChunkCodec: Send + Sync {
    /// Compress one whole chunk into `out`.
    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> EncodeStats;
    /// Decompress one whole chunk into `out`.
    fn decompress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CorruptionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_write_flag_then_payload() {
        let mut out = Vec::new();
        Token::Literal(b'x').write_to(&mut out);
        Token::Match { offset: 0x0102, length: 9 }.write_to(&mut out);
        assert_eq!(out, [0x00, b'x', 0x01, 0x01, 0x02, 9]);
        assert_eq!(out.len(), LITERAL_TOKEN_LEN + MATCH_TOKEN_LEN);
        assert_eq!(Token::Match { offset: 1, length: 3 }.flag().payload_len(), 3);
    }
}
