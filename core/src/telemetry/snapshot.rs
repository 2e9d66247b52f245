//! telemetry/snapshot.rs
//! Immutable end-of-run summary.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Counters, ratios, throughput and stage timings of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub chunks: u64,
    pub bytes_original: u64,
    pub bytes_compressed: u64,
    pub bytes_overhead: u64,
    pub tokens_literal: u64,
    pub tokens_match: u64,
    pub size_mismatches: u64,
    /// Container bytes over original bytes. Above 1.0 when the data expanded.
    pub compression_ratio: f64,
    pub throughput_bytes_per_sec: f64,
    pub workers: usize,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer, workers: usize) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = if counters.bytes_original > 0 {
            counters.container_bytes() as f64 / counters.bytes_original as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_original as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            chunks: counters.chunks,
            bytes_original: counters.bytes_original,
            bytes_compressed: counters.bytes_compressed,
            bytes_overhead: counters.bytes_overhead,
            tokens_literal: counters.tokens_literal,
            tokens_match: counters.tokens_match,
            size_mismatches: counters.size_mismatches,
            compression_ratio,
            throughput_bytes_per_sec: throughput,
            workers,
            elapsed,
            stage_times: *timer.stage_times(),
        }
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Bytes of the container (compress) or consumed container (decompress).
    pub fn container_bytes(&self) -> u64 {
        self.bytes_compressed + self.bytes_overhead
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
