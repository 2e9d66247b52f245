//! mtc-core
//!
//! Chunked, multithreaded LZ77 compression engine producing the MTC1 container.
//! No CLI, no terminal output: callers get results and telemetry back.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Codec, container and concurrency layers
pub mod compression;
pub mod container;
pub mod pool;
pub mod telemetry;

// Chunk pipeline
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{LzParams, Lz77Codec, decode, encode};
    pub use crate::pipeline::{
        ApiConfig, PipelineConfig, SizeCheck,
        compress_bytes, compress_file, decompress_bytes, decompress_file,
    };
    pub use crate::pipeline::ParallelismProfile;
    pub use crate::pool::WorkerPool;
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{ErrorKind, MtcError, MtcResult};
}
