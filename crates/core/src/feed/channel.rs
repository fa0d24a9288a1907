//! Bridge from an async snapshot stream to a sink.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::error::FeedError;
use super::live::{Delivery, SnapshotResult, SnapshotSink};
use super::source::Subscription;

/// Subscription backed by a forwarding task. Cancelling aborts the task.
#[derive(Debug)]
pub struct ForwarderSubscription {
    handle: JoinHandle<()>,
}

impl ForwarderSubscription {
    /// Whether the forwarding task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Subscription for ForwarderSubscription {
    fn cancel(&mut self) {
        self.handle.abort();
    }
}

impl Drop for ForwarderSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task that hands every received snapshot to `sink`.
///
/// When the stream ends the sink receives `FeedError::Closed`. The task
/// stops early once the sink's view is gone. Must be called inside a tokio
/// runtime.
#[must_use]
pub fn spawn_forwarder(
    mut rx: mpsc::Receiver<SnapshotResult>,
    sink: SnapshotSink,
) -> ForwarderSubscription {
    let handle = tokio::spawn(async move {
        let generation = sink.generation();
        while let Some(result) = rx.recv().await {
            if sink.deliver(result) == Delivery::Detached {
                tracing::debug!(generation, "view dropped, stopping forwarder");
                return;
            }
        }
        tracing::debug!(generation, "snapshot stream ended");
        sink.deliver(Err(FeedError::Closed));
    });
    ForwarderSubscription { handle }
}
