/// Magic tag for the chunked container.
/// "MTC1" = Multithreaded Chunked container v1
pub const MAGIC_MTC1: [u8; 4] = *b"MTC1";

/// Defaults when Option<T> is None
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024; // 1 MiB

/// Chunks per worker kept in flight before the coordinator starts draining.
pub const DEFAULT_INFLIGHT_PER_WORKER: usize = 4;

/// Upper bound on pool threads.
pub const MAX_WORKERS: usize = 4096;

/// Default LZ77 window (maximum back-reference distance).
pub const DEFAULT_WINDOW_SIZE: usize = 1 << 12; // 4096

/// Default and hard maximum copy length of a single match token.
pub const DEFAULT_MAX_MATCH_LEN: usize = 255;

/// Offsets travel as a 2-byte field.
pub const MAX_WINDOW_SIZE: usize = u16::MAX as usize;

/// Lengths travel as a 1-byte field.
pub const MAX_MATCH_LEN: usize = u8::MAX as usize;

/// Shortest match the encoder will emit.
pub const MIN_MATCH_LEN: usize = 3;
