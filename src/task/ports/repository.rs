//! Repository port for task persistence, ranged lookup and live
//! subscriptions.

use super::subscription::TaskSubscription;
use crate::task::domain::{OwnerId, Partition, Task, TaskChanges, TaskDraft, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Sort direction of a ranged read.
///
/// Active partitions sort by order key; the achieved partition sorts by
/// achievement timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Partition-scoped, ordered, limited read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankedQuery {
    /// Owner whose tasks are read.
    pub owner_id: OwnerId,
    /// Partition to read.
    pub partition: Partition,
    /// Sort direction.
    pub direction: SortDirection,
    /// Maximum number of tasks returned.
    pub limit: usize,
}

impl RankedQuery {
    /// Creates a query.
    #[must_use]
    pub const fn new(
        owner_id: OwnerId,
        partition: Partition,
        direction: SortDirection,
        limit: usize,
    ) -> Self {
        Self {
            owner_id,
            partition,
            direction,
            limit,
        }
    }

    /// Returns `true` when `task` belongs to the queried owner and
    /// partition.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.owner_id() == &self.owner_id && task.partition() == self.partition
    }
}

/// Task persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task, assigning its identifier and creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the store cannot be
    /// reached.
    async fn insert(&self, draft: &TaskDraft) -> TaskRepositoryResult<Task>;

    /// Merges content and placement into an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskRepositoryResult<()>;

    /// Deletes a task. Deleting an absent task succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the store cannot be
    /// reached.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns at most `query.limit` tasks of one partition, sorted.
    async fn find_ranked(&self, query: &RankedQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns achieved tasks with `start <= achieved_at < end`, oldest
    /// first, at most `limit` of them.
    async fn find_achieved_between(
        &self,
        owner_id: &OwnerId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Opens a live subscription delivering a snapshot of the queried
    /// partition on every matching write.
    async fn subscribe(&self, query: &RankedQuery) -> TaskRepositoryResult<TaskSubscription>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The store could not be reached.
    #[error("task store is unavailable")]
    Unavailable,

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
