//! The world-mutation thread.
//!
//! All position changes run on a single task that drains an unbounded queue,
//! in submission order. Callers hand work off with `submit` and never wait.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::ports::{WorldExecutor, WorldTask};

/// `WorldExecutor` backed by one tokio task.
pub struct TokioWorldExecutor {
    tx: UnboundedSender<WorldTask>,
    cancel: CancellationToken,
}

impl TokioWorldExecutor {
    /// Create the executor and spawn its task. Must be called inside a tokio runtime.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, rx) = unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_world_tasks(rx, cancel.clone()));
        (Self { tx, cancel }, handle)
    }

    /// Stop draining the queue. Tasks not yet started are dropped.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("World executor shutting down");
            self.cancel.cancel();
        }
    }
}

impl WorldExecutor for TokioWorldExecutor {
    fn submit(&self, task: WorldTask) {
        if self.tx.send(task).is_err() {
            tracing::warn!("World executor stopped; dropping world task");
        }
    }
}

async fn run_world_tasks(mut rx: UnboundedReceiver<WorldTask>, cancel: CancellationToken) {
    tracing::info!("Starting world executor");
    loop {
        let task = tokio::select! {
            _ = cancel.cancelled() => break,
            task = rx.recv() => match task {
                Some(task) => task,
                None => break,
            },
        };

        if catch_unwind(AssertUnwindSafe(task)).is_err() {
            tracing::error!("World task panicked");
        }
    }
    tracing::info!("World executor stopped");
}
