//! telemetry/mod.rs
//! Run telemetry: counters, stage timers, and immutable snapshots.
//!
//! Notes:
//! - Counters are owned by the coordinating thread; workers report their
//!   share through task results, so no atomics are involved.
//! - Stage times for worker stages are summed across workers and can exceed
//!   the wall-clock `elapsed` of a parallel run.
//! - Snapshots serialize to JSON for the CLI's `--stats` output.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
