use std::any::Any;

use crossbeam::channel::{Receiver, TryRecvError};

/// Failures that originate in the pool rather than in the task itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("pool is shut down, task rejected")]
    ShutDown,

    #[error("task panicked: {0}")]
    TaskPanicked(String),

    #[error("task dropped before producing a result")]
    Abandoned,
}

/// Receipt for one submitted task.
///
/// Handles are independent: any of them may be awaited in any order, from
/// the thread that submitted them or another one.
#[derive(Debug)]
pub struct TaskHandle<R> {
    pub(crate) id: u64,
    pub(crate) rx: Receiver<Result<R, PoolError>>,
}

impl<R> TaskHandle<R> {
    /// Submission sequence number, unique within one pool.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the task has finished and return its output.
    pub fn wait(self) -> Result<R, PoolError> {
        self.rx.recv().unwrap_or(Err(PoolError::Abandoned))
    }

    /// Non-blocking check. `None` while the task is still queued or running.
    /// The result can be taken once; later calls report `Abandoned`.
    pub fn try_wait(&self) -> Option<Result<R, PoolError>> {
        match self.rx.try_recv() {
            Ok(res) => Some(res),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(PoolError::Abandoned)),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
