//! Live partition snapshots.

use crate::task::domain::Task;
use tokio::sync::mpsc;

/// Where a snapshot's latest change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotOrigin {
    /// Includes a local write the store has not yet confirmed.
    LocalPending,
    /// Reflects only confirmed store state.
    Confirmed,
}

/// Sorted contents of one partition at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSnapshot {
    /// Tasks in display order.
    pub tasks: Vec<Task>,
    /// Origin of the change that produced the snapshot.
    pub origin: SnapshotOrigin,
}

impl PartitionSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(tasks: Vec<Task>, origin: SnapshotOrigin) -> Self {
        Self { tasks, origin }
    }

    /// Returns `true` when the snapshot carries unconfirmed local writes.
    #[must_use]
    pub const fn is_locally_pending(&self) -> bool {
        matches!(self.origin, SnapshotOrigin::LocalPending)
    }
}

/// Receiving end of a live subscription.
///
/// The sequence ends when the store drops the sending side; consumers
/// restart it by subscribing again.
#[derive(Debug)]
pub struct TaskSubscription {
    receiver: mpsc::UnboundedReceiver<PartitionSnapshot>,
}

impl TaskSubscription {
    /// Creates a connected sender and subscription pair.
    #[must_use]
    pub fn channel() -> (mpsc::UnboundedSender<PartitionSnapshot>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { receiver })
    }

    /// Waits for the next snapshot.
    pub async fn next(&mut self) -> Option<PartitionSnapshot> {
        self.receiver.recv().await
    }

    /// Returns the next snapshot if one is already queued.
    pub fn try_next(&mut self) -> Option<PartitionSnapshot> {
        self.receiver.try_recv().ok()
    }
}
