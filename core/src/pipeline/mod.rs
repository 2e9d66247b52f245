//! pipeline: chunked parallel compression and decompression.
//!
//! This module exposes the stable public API for library users and the CLI.
//! Internals are layered: chunk planning, file access, pool tasks, ordered
//! reassembly, and the two pipeline drivers.

pub mod chunking;
pub mod io;
pub mod parallelism;
pub mod tasks;
pub mod ordering;
pub mod pipeline;
pub mod core;

pub use chunking::{ChunkPlan, ChunkSpan};
pub use io::{AtomicFileSink, ChunkSource, FileSource, MemorySource};
pub use parallelism::ParallelismProfile;
pub use pipeline::{run_compress_pipeline, run_decompress_pipeline};
pub use self::core::{
    ApiConfig,
    PipelineConfig,
    SizeCheck,
    compress_bytes,
    compress_file,
    decompress_bytes,
    decompress_file,
};
