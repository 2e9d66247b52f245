//! Stable public API: configuration plus file and in-memory entry points.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::compression::{ChunkCodec, Lz77Codec, LzParams};
use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_INFLIGHT_PER_WORKER};
use crate::pipeline::io::{AtomicFileSink, FileSource, MemorySource};
use crate::pipeline::parallelism::ParallelismProfile;
use crate::pipeline::pipeline::{run_compress_pipeline, run_decompress_pipeline};
use crate::pool::WorkerPool;
use crate::telemetry::TelemetrySnapshot;
use crate::types::MtcError;

/// What to do when a decoded container disagrees with its own metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCheck {
    /// Log a warning, count it, keep going.
    #[default]
    Warn,
    /// Fail the run.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Bytes per chunk; the last chunk may be shorter.
    pub chunk_size: usize,
    pub lz: LzParams,
    /// Applies to decoded chunk sizes and trailing bytes.
    pub size_check: SizeCheck,
    /// Outstanding chunks per run. `None` means four per worker.
    pub max_inflight: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            lz: LzParams::default(),
            size_check: SizeCheck::Warn,
            max_inflight: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_lz(mut self, lz: LzParams) -> Self {
        self.lz = lz;
        self
    }

    pub fn strict(mut self) -> Self {
        self.size_check = SizeCheck::Strict;
        self
    }

    pub fn with_max_inflight(mut self, max_inflight: usize) -> Self {
        self.max_inflight = Some(max_inflight);
        self
    }

    pub fn inflight_limit(&self, workers: usize) -> usize {
        self.max_inflight
            .unwrap_or_else(|| workers.max(1).saturating_mul(DEFAULT_INFLIGHT_PER_WORKER))
    }

    pub fn validate(&self) -> Result<(), MtcError> {
        if self.chunk_size == 0 {
            return Err(MtcError::argument("chunk size must be at least 1 byte"));
        }
        if self.max_inflight == Some(0) {
            return Err(MtcError::argument("in-flight chunk limit must be at least 1"));
        }
        self.lz.validate()
    }
}

/// Everything a single API call needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiConfig {
    pub pipeline: PipelineConfig,
    pub parallelism: ParallelismProfile,
}

impl ApiConfig {
    pub fn new(pipeline: PipelineConfig, parallelism: ParallelismProfile) -> Self {
        Self { pipeline, parallelism }
    }

    pub fn single_threaded() -> Self {
        Self::new(PipelineConfig::default(), ParallelismProfile::single_threaded())
    }

    pub fn with_workers(workers: usize) -> Self {
        Self::new(PipelineConfig::default(), ParallelismProfile::with_workers(workers))
    }

    pub fn validate(&self) -> Result<(), MtcError> {
        self.parallelism.validate()?;
        self.pipeline.validate()
    }

    /// Pipeline settings with the profile's in-flight window filled in when
    /// no explicit limit was set.
    fn resolved_pipeline(&self) -> PipelineConfig {
        let mut cfg = self.pipeline;
        cfg.max_inflight = Some(cfg.max_inflight.unwrap_or(self.parallelism.inflight));
        cfg
    }
}

fn setup(config: &ApiConfig) -> Result<(WorkerPool, Arc<dyn ChunkCodec>, PipelineConfig), MtcError> {
    config.validate()?;
    let pipeline = config.resolved_pipeline();
    let codec: Arc<dyn ChunkCodec> = Arc::new(Lz77Codec::new(pipeline.lz)?);
    let pool = WorkerPool::new(config.parallelism.workers)?;
    Ok((pool, codec, pipeline))
}

/// Compress `input` into an MTC1 container at `output`.
///
/// `output` only appears once the whole container has been written; on error
/// any existing file at that path is left untouched.
pub fn compress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ApiConfig,
) -> Result<TelemetrySnapshot, MtcError> {
    let (pool, codec, pipeline) = setup(config)?;
    let mut source = FileSource::open(input)?;
    let mut sink = AtomicFileSink::create(output)?;
    let snapshot = run_compress_pipeline(&mut source, &mut sink, &pool, codec, &pipeline)?;
    sink.commit()?;
    Ok(snapshot)
}

/// Restore the original bytes of the container at `input` into `output`.
pub fn decompress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ApiConfig,
) -> Result<TelemetrySnapshot, MtcError> {
    let (pool, codec, pipeline) = setup(config)?;
    let reader = BufReader::new(File::open(input)?);
    let mut sink = AtomicFileSink::create(output)?;
    let snapshot = run_decompress_pipeline(reader, &mut sink, &pool, codec, &pipeline)?;
    sink.commit()?;
    Ok(snapshot)
}

pub fn compress_bytes(
    data: impl Into<Bytes>,
    config: &ApiConfig,
) -> Result<(Vec<u8>, TelemetrySnapshot), MtcError> {
    let (pool, codec, pipeline) = setup(config)?;
    let mut source = MemorySource::new(data);
    let mut out = Vec::new();
    let snapshot = run_compress_pipeline(&mut source, &mut out, &pool, codec, &pipeline)?;
    Ok((out, snapshot))
}

pub fn decompress_bytes(
    container: &[u8],
    config: &ApiConfig,
) -> Result<(Vec<u8>, TelemetrySnapshot), MtcError> {
    let (pool, codec, pipeline) = setup(config)?;
    let mut out = Vec::new();
    let snapshot = run_decompress_pipeline(container, &mut out, &pool, codec, &pipeline)?;
    Ok((out, snapshot))
}
