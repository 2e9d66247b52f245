//! telemetry/counters.rs
//! Mutable counters collected while a pipeline runs.
//!
//! Converted into an immutable `TelemetrySnapshot` at the end of the run.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::compression::EncodeStats;

/// Deterministic counters collected during one compress or decompress run.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub chunks: u64,
    pub bytes_original: u64,
    pub bytes_compressed: u64,
    pub bytes_overhead: u64,
    pub tokens_literal: u64,
    pub tokens_match: u64,
    pub size_mismatches: u64,
}

impl TelemetryCounters {
    /// Record one chunk.
    ///
    /// - `original_len`: uncompressed chunk length
    /// - `compressed_len`: token stream length
    pub fn add_chunk(&mut self, original_len: u64, compressed_len: u64) {
        self.chunks += 1;
        self.bytes_original += original_len;
        self.bytes_compressed += compressed_len;
    }

    /// Container header and record headers.
    pub fn add_overhead(&mut self, len: usize) {
        self.bytes_overhead += len as u64;
    }

    pub fn add_tokens(&mut self, stats: EncodeStats) {
        self.tokens_literal += stats.literals;
        self.tokens_match += stats.matches;
    }

    /// A decoded chunk whose length disagreed with its record.
    pub fn add_size_mismatch(&mut self) {
        self.size_mismatches += 1;
    }

    /// Size of the container: payloads plus framing.
    pub fn container_bytes(&self) -> u64 {
        self.bytes_compressed + self.bytes_overhead
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.chunks += other.chunks;
        self.bytes_original += other.bytes_original;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_overhead += other.bytes_overhead;
        self.tokens_literal += other.tokens_literal;
        self.tokens_match += other.tokens_match;
        self.size_mismatches += other.size_mismatches;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
