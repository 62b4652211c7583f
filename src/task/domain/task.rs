//! Task aggregate root and write payloads.

use super::{OrderKey, OwnerId, Partition, TaskContent, TaskId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Placement of a task: either active with a pin flag and an order key, or
/// achieved at a timestamp.
///
/// Keeping the two shapes apart means an achieved task can never carry an
/// order key or a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is not yet achieved.
    Active {
        /// Whether the task sits in the pinned list.
        pinned: bool,
        /// Position within its list.
        order: OrderKey,
    },
    /// Task has been achieved.
    Achieved {
        /// User-chosen achievement timestamp.
        achieved_at: DateTime<Utc>,
    },
}

impl TaskStatus {
    /// Returns the partition this status places a task in.
    #[must_use]
    pub const fn partition(self) -> Partition {
        match self {
            Self::Active { pinned: true, .. } => Partition::PinnedActive,
            Self::Active { pinned: false, .. } => Partition::UnpinnedActive,
            Self::Achieved { .. } => Partition::Achieved,
        }
    }

    /// Returns the order key, or `None` once achieved.
    #[must_use]
    pub const fn order(self) -> Option<OrderKey> {
        match self {
            Self::Active { order, .. } => Some(order),
            Self::Achieved { .. } => None,
        }
    }

    /// Returns the pin flag, or `None` once achieved.
    #[must_use]
    pub const fn pinned(self) -> Option<bool> {
        match self {
            Self::Active { pinned, .. } => Some(pinned),
            Self::Achieved { .. } => None,
        }
    }

    /// Returns the achievement timestamp, or `None` while active.
    #[must_use]
    pub const fn achieved_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active { .. } => None,
            Self::Achieved { achieved_at } => Some(achieved_at),
        }
    }
}

/// Task aggregate root.
///
/// Tasks serialize for display but never deserialize directly; stored
/// documents enter through [`super::StoredTaskRecord::upgrade`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    owner_id: OwnerId,
    content: TaskContent,
    status: TaskStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Task text.
    pub content: TaskContent,
    /// Placement of the task.
    pub status: TaskStatus,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            content: data.content,
            status: data.status,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Returns the task text.
    #[must_use]
    pub const fn content(&self) -> &TaskContent {
        &self.content
    }

    /// Returns the task placement.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the partition the task currently belongs to.
    #[must_use]
    pub const fn partition(&self) -> Partition {
        self.status.partition()
    }

    /// Returns the order key, or `None` once achieved.
    #[must_use]
    pub const fn order(&self) -> Option<OrderKey> {
        self.status.order()
    }

    /// Returns the pin flag, or `None` once achieved.
    #[must_use]
    pub const fn pinned(&self) -> Option<bool> {
        self.status.pinned()
    }

    /// Returns the achievement timestamp, or `None` while active.
    #[must_use]
    pub const fn achieved_at(&self) -> Option<DateTime<Utc>> {
        self.status.achieved_at()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Merges an update into this task. Identity, owner and creation time
    /// are left untouched.
    pub fn apply(&mut self, changes: TaskChanges) {
        self.content = changes.content;
        self.status = changes.status;
    }
}

/// Payload for inserting a new task. The store assigns the identifier and
/// the creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Owning user.
    pub owner_id: OwnerId,
    /// Task text.
    pub content: TaskContent,
    /// Initial placement.
    pub status: TaskStatus,
}

/// Partial-field update of an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement text.
    pub content: TaskContent,
    /// Replacement placement.
    pub status: TaskStatus,
}
