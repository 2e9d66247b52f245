//! compression/constants.rs
//! Stable token flag bytes for the wire format.

/// Token flag bytes (first byte of every token).
pub mod token_flags {
    pub const LITERAL: u8 = 0x00;
    pub const MATCH: u8   = 0x01;
}

/// Total encoded size of each token kind, flag included.
pub const LITERAL_TOKEN_LEN: usize = 2;
pub const MATCH_TOKEN_LEN: usize = 4;
