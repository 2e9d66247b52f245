use crate::constants::{DEFAULT_INFLIGHT_PER_WORKER, MAX_WORKERS};
use crate::types::MtcError;

/// Parallelism configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismProfile {
    /// Worker threads in the pool.
    pub workers: usize,
    /// Chunks submitted but not yet collected, per pipeline run.
    pub inflight: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::dynamic()
    }
}

impl ParallelismProfile {
    pub fn new(workers: usize, inflight: usize) -> Self {
        Self { workers, inflight }
    }

    pub fn single_threaded() -> Self {
        Self { workers: 1, inflight: 1 }
    }

    /// One worker per hardware thread.
    pub fn dynamic() -> Self {
        Self::with_workers(num_cpus::get())
    }

    /// `workers` threads (at least one) with the default in-flight window.
    pub fn with_workers(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            workers,
            inflight: workers.saturating_mul(DEFAULT_INFLIGHT_PER_WORKER),
        }
    }

    pub fn validate(&self) -> Result<(), MtcError> {
        if self.workers == 0 {
            return Err(MtcError::argument("worker count must be at least 1"));
        }
        if self.workers > MAX_WORKERS {
            return Err(MtcError::argument(format!("worker count {} exceeds {MAX_WORKERS}", self.workers)));
        }
        if self.inflight == 0 {
            return Err(MtcError::argument("in-flight chunk limit must be at least 1"));
        }
        Ok(())
    }
}
