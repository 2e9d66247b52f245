//! compression/decode.rs
//! Strict token stream parsing and LZ77 replay.

use byteorder::{BigEndian, ByteOrder};

use crate::compression::types::{CorruptionError, Token, TokenFlag};

/// Iterator over the tokens of a stream.
///
/// Yields an error (and then stops) on the first malformed token.
pub struct TokenIter<'a> {
    input: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> TokenIter<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0, failed: false }
    }

    /// Byte offset of the next token's flag.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn parse_next(&mut self) -> Result<Token, CorruptionError> {
        let flag_pos = self.pos;
        let raw = self.input[flag_pos];

        let flag = TokenFlag::try_from(raw)
            .map_err(|_| CorruptionError::UnknownFlag { flag: raw, position: flag_pos })?;

        let payload = &self.input[flag_pos + 1..];
        let needed = flag.payload_len();
        if payload.len() < needed {
            return Err(CorruptionError::TruncatedToken {
                flag: raw,
                position: flag_pos,
                needed,
                available: payload.len(),
            });
        }

        let token = match flag {
            TokenFlag::Literal => Token::Literal(payload[0]),
            TokenFlag::Match => Token::Match {
                offset: BigEndian::read_u16(&payload[0..2]),
                length: payload[2],
            },
        };
        self.pos = flag_pos + 1 + needed;
        Ok(token)
    }
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Result<Token, CorruptionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }
        let res = self.parse_next();
        if res.is_err() {
            self.failed = true;
        }
        Some(res)
    }
}

/// Parse a whole stream into tokens without replaying it.
pub fn parse_tokens(input: &[u8]) -> Result<Vec<Token>, CorruptionError> {
    TokenIter::new(input).collect()
}

/// Decode a token stream into a fresh buffer.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, CorruptionError> {
    let mut out = Vec::with_capacity(input.len());
    decode_into(input, &mut out)?;
    Ok(out)
}

/// Append the decoded bytes of `input` to `out`.
///
/// Back-references may only reach bytes produced by this call, never bytes
/// that were already in `out`. A match of length 0 is a no-op.
pub fn decode_into(input: &[u8], out: &mut Vec<u8>) -> Result<(), CorruptionError> {
    let base = out.len();
    let mut tokens = TokenIter::new(input);

    loop {
        let position = tokens.position();
        let token = match tokens.next() {
            Some(t) => t?,
            None => break,
        };

        match token {
            Token::Literal(b) => out.push(b),
            Token::Match { offset, length } => {
                let decoded = out.len() - base;
                if offset == 0 || offset as usize > decoded {
                    return Err(CorruptionError::InvalidOffset { offset, decoded, position });
                }

                // Byte-at-a-time so the copy can read what it just wrote.
                let start = out.len() - offset as usize;
                out.reserve(length as usize);
                for k in 0..length as usize {
                    let b = out[start + k];
                    out.push(b);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_match_expands_run() {
        let stream = [0x00, b'x', 0x01, 0x00, 0x01, 5];
        assert_eq!(decode(&stream).unwrap(), b"xxxxxx");
    }

    #[test]
    fn zero_length_match_is_noop() {
        let stream = [0x00, b'x', 0x01, 0x00, 0x01, 0];
        assert_eq!(decode(&stream).unwrap(), b"x");
    }

    #[test]
    fn references_do_not_reach_prior_output() {
        let mut out = b"prefix".to_vec();
        let err = decode_into(&[0x01, 0x00, 0x01, 3], &mut out).unwrap_err();
        assert!(matches!(err, CorruptionError::InvalidOffset { offset: 1, decoded: 0, position: 0 }));
    }

    #[test]
    fn token_iter_stops_after_error() {
        let mut it = TokenIter::new(&[0x02, 0x00, b'a']);
        assert!(matches!(it.next(), Some(Err(CorruptionError::UnknownFlag { flag: 0x02, position: 0 }))));
        assert!(it.next().is_none());
    }
}
