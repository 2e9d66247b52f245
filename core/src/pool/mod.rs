//! Fixed-size worker pool.
//!
//! Responsibilities:
//! - Run submitted closures on a bounded set of OS threads
//! - Hand each submission back its own result through a `TaskHandle`
//! - Keep one failing or panicking task from affecting any other
//!
//! Non-responsibilities:
//! - Ordering of results (callers key results themselves)
//! - Cancellation or deadlines

pub mod types;
pub mod pool;

pub use types::{
    PoolError,
    TaskHandle,
};
pub use pool::{
    WorkerPool,
};
