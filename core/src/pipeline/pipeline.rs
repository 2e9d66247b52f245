//! Pipeline drivers: read on the calling thread, code on the pool, write in
//! chunk order.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::compression::{ChunkCodec, CorruptionError};
use crate::constants::{DEFAULT_INFLIGHT_PER_WORKER, MAX_WORKERS};
use crate::container::{ContainerHeader, ContainerReader, ContainerWriter, FormatError, RecordHeader};
use crate::pipeline::chunking::{ChunkPlan, ChunkSpan};
use crate::pipeline::core::{PipelineConfig, SizeCheck};
use crate::pipeline::io::ChunkSource;
use crate::pipeline::ordering::ChunkSlots;
use crate::pipeline::tasks::{CompressTask, CompressedChunk, DecompressTask, DecompressedChunk};
use crate::pool::{TaskHandle, WorkerPool};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::MtcError;

// ============================================================
// Compress pipeline
// ============================================================

/// Writes results to the container strictly by chunk index, holding back any
/// that arrive ahead of a gap.
struct OrderedChunkWriter<'p, W: Write> {
    plan: &'p ChunkPlan,
    slots: ChunkSlots<CompressedChunk>,
    out: ContainerWriter<W>,
}

impl<'p, W: Write> OrderedChunkWriter<'p, W> {
    fn new(plan: &'p ChunkPlan, out: W) -> Result<Self, MtcError> {
        Ok(Self {
            plan,
            slots: ChunkSlots::with_len(plan.chunk_count() as usize),
            out: ContainerWriter::new(out, plan.chunk_count())?,
        })
    }

    fn push(&mut self, chunk: CompressedChunk, counters: &mut TelemetryCounters) -> Result<(), MtcError> {
        self.slots.place(chunk.index as usize, chunk)?;
        self.flush_ready(counters)
    }

    fn flush_ready(&mut self, counters: &mut TelemetryCounters) -> Result<(), MtcError> {
        while let Some(chunk) = self.slots.take_ready() {
            let span = self.plan.span(chunk.index).ok_or_else(|| {
                MtcError::Pipeline(format!("chunk {} is not in the plan", chunk.index))
            })?;
            // The record header takes its size from the plan.
            if chunk.original_len != span.len as u64 {
                return Err(MtcError::Pipeline(format!(
                    "chunk {} encoded {} bytes, plan says {}",
                    chunk.index, chunk.original_len, span.len
                )));
            }
            self.out.write_record(span.len as u64, &chunk.payload)?;
            counters.add_chunk(span.len as u64, chunk.payload.len() as u64);
            counters.add_overhead(RecordHeader::LEN);
        }
        Ok(())
    }

    fn finish(self) -> Result<W, MtcError> {
        if !self.slots.is_drained() {
            return Err(MtcError::Pipeline(format!(
                "chunk {} never completed",
                self.slots.next_index()
            )));
        }
        self.out.finish()
    }
}

/// Initial capacity for the in-flight queue. The header chunk count is not
/// trusted, so the reservation is capped as well.
fn window_capacity(inflight_limit: usize, chunk_count: u32) -> usize {
    let chunks = usize::try_from(chunk_count).unwrap_or(usize::MAX);
    inflight_limit.min(chunks).min(MAX_WORKERS * DEFAULT_INFLIGHT_PER_WORKER)
}

/// Compress everything `source` holds into an MTC1 container on `writer`.
///
/// Chunks are read on the calling thread and encoded on `pool`; at most
/// `config.inflight_limit(..)` chunks are outstanding at a time.
pub fn run_compress_pipeline<S, W>(
    source: &mut S,
    writer: W,
    pool: &WorkerPool,
    codec: Arc<dyn ChunkCodec>,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, MtcError>
where
    S: ChunkSource + ?Sized,
    W: Write,
{
    config.validate()?;
    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();

    let total = source.total_len()?;
    let plan = ChunkPlan::new(total, config.chunk_size)?;
    let inflight_limit = config.inflight_limit(pool.worker_count());
    info!(
        bytes = total,
        chunks = plan.chunk_count(),
        chunk_size = config.chunk_size,
        workers = pool.worker_count(),
        inflight = inflight_limit,
        "starting compression"
    );

    let mut out = OrderedChunkWriter::new(&plan, writer)?;
    counters.add_overhead(ContainerHeader::LEN);

    let mut inflight: VecDeque<TaskHandle<CompressedChunk>> =
        VecDeque::with_capacity(window_capacity(inflight_limit, plan.chunk_count()));
    for span in plan.spans() {
        if inflight.len() >= inflight_limit {
            if let Some(handle) = inflight.pop_front() {
                collect_compressed(handle, &mut out, &mut counters, &mut timer)?;
            }
        }

        let bytes = timer.time(Stage::Read, || read_span(source, &span))?;
        let task = CompressTask { index: span.index, bytes };
        let codec = Arc::clone(&codec);
        debug!(chunk = span.index, offset = span.offset, len = span.len, "dispatching chunk");
        inflight.push_back(pool.submit(move || task.run(codec.as_ref()))?);
    }

    while let Some(handle) = inflight.pop_front() {
        collect_compressed(handle, &mut out, &mut counters, &mut timer)?;
    }

    timer.time(Stage::Write, || out.finish())?;
    timer.finish();

    let snapshot = TelemetrySnapshot::from(&counters, &timer, pool.worker_count());
    info!(
        chunks = snapshot.chunks,
        bytes_in = snapshot.bytes_original,
        bytes_out = snapshot.container_bytes(),
        ratio = snapshot.compression_ratio,
        elapsed_ms = snapshot.elapsed.as_millis() as u64,
        "compression finished"
    );
    Ok(snapshot)
}

fn read_span<S: ChunkSource + ?Sized>(source: &mut S, span: &ChunkSpan) -> Result<bytes::Bytes, MtcError> {
    let bytes = source.read_range(span.offset, span.len)?;
    if bytes.len() != span.len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "input shrank: chunk {} at offset {} returned {} of {} bytes",
                span.index,
                span.offset,
                bytes.len(),
                span.len
            ),
        )
        .into());
    }
    Ok(bytes)
}

fn collect_compressed<W: Write>(
    handle: TaskHandle<CompressedChunk>,
    out: &mut OrderedChunkWriter<'_, W>,
    counters: &mut TelemetryCounters,
    timer: &mut TelemetryTimer,
) -> Result<(), MtcError> {
    let chunk = handle.wait()?;
    debug!(
        chunk = chunk.index,
        original = chunk.original_len,
        compressed = chunk.payload.len(),
        "chunk compressed"
    );
    timer.add_stage_time(Stage::Compress, chunk.elapsed);
    counters.add_tokens(chunk.stats);
    let write_start = std::time::Instant::now();
    out.push(chunk, counters)?;
    timer.add_stage_time(Stage::Write, write_start.elapsed());
    Ok(())
}

// ============================================================
// Decompress pipeline
// ============================================================

/// Decode an MTC1 container from `reader` onto `writer`.
///
/// Records are decoded on `pool` and written strictly in record order.
pub fn run_decompress_pipeline<R, W>(
    reader: R,
    mut writer: W,
    pool: &WorkerPool,
    codec: Arc<dyn ChunkCodec>,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, MtcError>
where
    R: Read,
    W: Write,
{
    config.validate()?;
    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();

    let mut container = timer.time(Stage::Read, || ContainerReader::open(reader))?;
    counters.add_overhead(ContainerHeader::LEN);
    let inflight_limit = config.inflight_limit(pool.worker_count());
    info!(
        chunks = container.chunk_count(),
        workers = pool.worker_count(),
        inflight = inflight_limit,
        "starting decompression"
    );

    let mut inflight: VecDeque<TaskHandle<Result<DecompressedChunk, CorruptionError>>> =
        VecDeque::with_capacity(window_capacity(inflight_limit, container.chunk_count()));
    while let Some(record) = timer.time(Stage::Read, || container.next_record())? {
        counters.add_overhead(RecordHeader::LEN);
        if inflight.len() >= inflight_limit {
            if let Some(handle) = inflight.pop_front() {
                collect_decompressed(handle, &mut writer, config.size_check, &mut counters, &mut timer)?;
            }
        }

        debug!(chunk = record.index, compressed = record.payload.len(), "dispatching record");
        let task = DecompressTask { record };
        let codec = Arc::clone(&codec);
        inflight.push_back(pool.submit(move || task.run(codec.as_ref()))?);
    }

    while let Some(handle) = inflight.pop_front() {
        collect_decompressed(handle, &mut writer, config.size_check, &mut counters, &mut timer)?;
    }

    let trailing = timer.time(Stage::Read, || container.trailing_bytes())?;
    if trailing > 0 {
        match config.size_check {
            SizeCheck::Warn => warn!(bytes = trailing, "ignoring bytes after the last record"),
            SizeCheck::Strict => return Err(FormatError::TrailingBytes { count: trailing }.into()),
        }
    }

    timer.time(Stage::Write, || writer.flush())?;
    timer.finish();

    let snapshot = TelemetrySnapshot::from(&counters, &timer, pool.worker_count());
    info!(
        chunks = snapshot.chunks,
        bytes_in = snapshot.container_bytes(),
        bytes_out = snapshot.bytes_original,
        size_mismatches = snapshot.size_mismatches,
        elapsed_ms = snapshot.elapsed.as_millis() as u64,
        "decompression finished"
    );
    Ok(snapshot)
}

fn collect_decompressed<W: Write>(
    handle: TaskHandle<Result<DecompressedChunk, CorruptionError>>,
    writer: &mut W,
    size_check: SizeCheck,
    counters: &mut TelemetryCounters,
    timer: &mut TelemetryTimer,
) -> Result<(), MtcError> {
    let chunk = handle.wait()??;
    timer.add_stage_time(Stage::Decompress, chunk.elapsed);

    let actual = chunk.bytes.len() as u64;
    if actual != chunk.declared_len {
        match size_check {
            SizeCheck::Warn => {
                warn!(
                    chunk = chunk.index,
                    expected = chunk.declared_len,
                    actual,
                    "decoded chunk size differs from record header"
                );
                counters.add_size_mismatch();
            }
            SizeCheck::Strict => {
                return Err(CorruptionError::SizeMismatch {
                    chunk_index: chunk.index,
                    expected: chunk.declared_len,
                    actual,
                }
                .into());
            }
        }
    }

    debug!(chunk = chunk.index, decoded = actual, "chunk decompressed");
    timer.time(Stage::Write, || writer.write_all(&chunk.bytes))?;
    counters.add_chunk(actual, chunk.compressed_len);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_capacity_is_bounded() {
        assert_eq!(window_capacity(8, 3), 3);
        assert_eq!(window_capacity(2, 100), 2);
        assert_eq!(window_capacity(usize::MAX, u32::MAX), MAX_WORKERS * DEFAULT_INFLIGHT_PER_WORKER);
    }
}
