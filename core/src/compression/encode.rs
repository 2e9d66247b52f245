//! compression/encode.rs
//! Greedy LZ77 encoder with an exhaustive window search.

use crate::compression::types::{EncodeStats, LzParams, Token};
use crate::constants::MIN_MATCH_LEN;

/// Encode `input` into a fresh token stream.
pub fn encode(input: &[u8], params: &LzParams) -> Vec<u8> {
    encode_with_stats(input, params).0
}

/// Encode `input` and report how many tokens of each kind were emitted.
pub fn encode_with_stats(input: &[u8], params: &LzParams) -> (Vec<u8>, EncodeStats) {
    let mut out = Vec::with_capacity(input.len() + input.len() / 2);
    let stats = encode_into(input, params, &mut out);
    (out, stats)
}

/// Append the token stream for `input` to `out`.
///
/// At every position the whole window `[pos - window_size, pos)` is scanned
/// from its floor forward and the best candidate is only replaced by a
/// strictly longer one, so among equally long matches the farthest wins.
/// After a match the cursor jumps past it without re-scanning.
pub fn encode_into(input: &[u8], params: &LzParams, out: &mut Vec<u8>) -> EncodeStats {
    let mut stats = EncodeStats::default();
    let mut pos = 0usize;

    while pos < input.len() {
        let (offset, len) = longest_match(input, pos, params);

        if len >= MIN_MATCH_LEN {
            // window_size <= u16::MAX and max_match_len <= u8::MAX are
            // enforced by LzParams::validate.
            Token::Match { offset: offset as u16, length: len as u8 }.write_to(out);
            stats.matches += 1;
            pos += len;
        } else {
            Token::Literal(input[pos]).write_to(out);
            stats.literals += 1;
            pos += 1;
        }
    }

    stats
}

/// Returns `(offset, length)` of the best match for `pos`, `(0, 0)` if none.
#[inline]
fn longest_match(input: &[u8], pos: usize, params: &LzParams) -> (usize, usize) {
    let limit = params.max_match_len.min(input.len() - pos);
    let floor = pos.saturating_sub(params.window_size);
    let ahead = &input[pos..pos + limit];

    let mut best_off = 0usize;
    let mut best_len = 0usize;

    for i in floor..pos {
        // The candidate may run into `ahead` itself; that is the overlap
        // which lets a single token expand a run.
        let len = input[i..]
            .iter()
            .zip(ahead)
            .take_while(|(a, b)| a == b)
            .count();

        if len > best_len {
            best_len = len;
            best_off = pos - i;
            if best_len == limit {
                break;
            }
        }
    }

    (best_off, best_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::constants::token_flags;

    #[test]
    fn short_input_is_all_literals() {
        let out = encode(b"ab", &LzParams::default());
        assert_eq!(out, vec![token_flags::LITERAL, b'a', token_flags::LITERAL, b'b']);
    }

    #[test]
    fn run_collapses_into_overlapping_match() {
        let out = encode(&[7u8; 10], &LzParams::default());
        // literal 7, then match offset 1 length 9
        assert_eq!(out, vec![0x00, 7, 0x01, 0x00, 0x01, 9]);
    }

    #[test]
    fn tie_prefers_farthest_candidate() {
        // "abcXabcYabc": at pos 8 both offset 8 and offset 4 give length 3.
        let out = encode(b"abcXabcYabc", &LzParams::default());
        let tail = &out[out.len() - 4..];
        assert_eq!(tail, &[0x01, 0x00, 0x08, 3]);
    }

    #[test]
    fn window_limits_reach() {
        let params = LzParams::new(3, 255).unwrap();
        // Repeat sits 4 bytes back: outside a window of 3.
        let out = encode(b"abcdabcd", &params);
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn match_length_capped_by_params() {
        let params = LzParams::new(4096, 4).unwrap();
        let out = encode(&[1u8; 9], &params);
        // literal, match(1,4), then the farthest equal candidate: match(5,4)
        assert_eq!(out, vec![0x00, 1, 0x01, 0, 1, 4, 0x01, 0, 5, 4]);
    }
}
