//! Suppression of locally pending subscription echoes.
//!
//! A client that writes a task immediately receives a snapshot containing
//! its own unconfirmed change, followed by the confirmed snapshot once the
//! store acknowledges it. Rendering both produces a duplicate render of the
//! same logical state, so consumers only ever see confirmed snapshots.

use crate::task::{
    domain::{Partition, Task},
    ports::{PartitionSnapshot, TaskSubscription},
};

/// Returns the snapshot's tasks unless it carries unconfirmed local writes.
#[must_use]
pub fn confirmed_tasks(snapshot: PartitionSnapshot) -> Option<Vec<Task>> {
    if snapshot.is_locally_pending() {
        None
    } else {
        Some(snapshot.tasks)
    }
}

/// Live partition view that yields only confirmed snapshots.
#[derive(Debug)]
pub struct ConfirmedSnapshots {
    partition: Partition,
    subscription: TaskSubscription,
}

impl ConfirmedSnapshots {
    /// Wraps a raw subscription on `partition`.
    #[must_use]
    pub const fn new(partition: Partition, subscription: TaskSubscription) -> Self {
        Self {
            partition,
            subscription,
        }
    }

    /// Returns the watched partition.
    #[must_use]
    pub const fn partition(&self) -> Partition {
        self.partition
    }

    /// Waits for the next confirmed snapshot, skipping pending echoes.
    ///
    /// Returns `None` once the underlying subscription closes.
    pub async fn next(&mut self) -> Option<Vec<Task>> {
        loop {
            let snapshot = self.subscription.next().await?;
            if let Some(tasks) = confirmed_tasks(snapshot) {
                return Some(tasks);
            }
            tracing::trace!(partition = %self.partition, "discarded locally pending snapshot");
        }
    }

    /// Returns the next confirmed snapshot already queued, without waiting.
    pub fn try_next(&mut self) -> Option<Vec<Task>> {
        while let Some(snapshot) = self.subscription.try_next() {
            if let Some(tasks) = confirmed_tasks(snapshot) {
                return Some(tasks);
            }
            tracing::trace!(partition = %self.partition, "discarded locally pending snapshot");
        }
        None
    }
}
