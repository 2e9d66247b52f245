use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam::channel::bounded;

use crate::constants::MAX_WORKERS;
use crate::pool::types::{panic_message, PoolError, TaskHandle};
use crate::types::MtcError;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct QueueState {
    jobs: VecDeque<Job>,
    stopping: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl Shared {
    // Jobs never run under the lock and their panics are caught, so a
    // poisoned mutex still holds a consistent queue.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fixed set of worker threads fed from one mutex-guarded FIFO queue.
///
/// Dropping the pool (or calling [`WorkerPool::shutdown`]) stops intake,
/// lets the workers finish everything already queued, and joins them.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    worker_count: usize,
    next_id: AtomicU64,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool").field("worker_count", &self.worker_count).finish_non_exhaustive()
    }
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, MtcError> {
        if workers == 0 {
            return Err(MtcError::argument("worker count must be at least 1"));
        }
        if workers > MAX_WORKERS {
            return Err(MtcError::argument(format!("worker count {workers} exceeds {MAX_WORKERS}")));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState { jobs: VecDeque::new(), stopping: false }),
            available: Condvar::new(),
        });

        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let worker_shared = shared.clone();
            let spawned = thread::Builder::new()
                .name(format!("mtc-worker-{i}"))
                .spawn(move || worker_loop(i, worker_shared));

            match spawned {
                Ok(h) => handles.push(h),
                Err(e) => {
                    // Release the threads that did start before bailing out.
                    let mut partial = WorkerPool {
                        shared,
                        workers: handles,
                        worker_count: i,
                        next_id: AtomicU64::new(0),
                    };
                    partial.shutdown();
                    return Err(MtcError::Io(e));
                }
            }
        }

        tracing::debug!(workers, "worker pool started");

        Ok(Self {
            shared,
            workers: handles,
            worker_count: workers,
            next_id: AtomicU64::new(0),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Number of tasks waiting for a worker.
    pub fn queued(&self) -> usize {
        self.shared.lock().jobs.len()
    }

    /// Queue `task` and return a handle to its eventual result.
    ///
    /// Never waits for the task; only takes the queue lock briefly.
    pub fn submit<F, R>(&self, task: F) -> Result<TaskHandle<R>, PoolError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = bounded::<Result<R, PoolError>>(1);

        let job: Job = Box::new(move || {
            let res = panic::catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| PoolError::TaskPanicked(panic_message(payload.as_ref())));
            // The handle may already be gone; nobody is waiting then.
            let _ = tx.send(res);
        });

        {
            let mut state = self.shared.lock();
            if state.stopping {
                return Err(PoolError::ShutDown);
            }
            state.jobs.push_back(job);
        }
        self.shared.available.notify_one();

        Ok(TaskHandle { id, rx })
    }

    /// Refuse further submissions, drain the queue and join all workers.
    /// Calling it more than once is harmless.
    pub fn shutdown(&mut self) {
        {
            let mut state = self.shared.lock();
            if state.stopping && self.workers.is_empty() {
                return;
            }
            state.stopping = true;
        }
        self.shared.available.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("worker thread terminated abnormally");
            }
        }
        tracing::debug!("worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(index: usize, shared: Arc<Shared>) {
    tracing::trace!(worker = index, "worker starting");
    loop {
        let job = {
            let mut state = shared.lock();
            loop {
                if let Some(job) = state.jobs.pop_front() {
                    break job;
                }
                if state.stopping {
                    tracing::trace!(worker = index, "worker exiting");
                    return;
                }
                state = shared
                    .available
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        job();
    }
}
