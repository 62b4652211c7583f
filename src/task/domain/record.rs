//! Mapping between stored task documents and the task aggregate.
//!
//! Documents written by older clients may lack fields or carry values that
//! the current shape forbids (for example a pin flag on an achieved task).
//! [`StoredTaskRecord::upgrade`] is the single place where such documents
//! are coerced into a valid [`Task`].
//!
//! Defaults applied to missing fields:
//!
//! | field        | default  |
//! |--------------|----------|
//! | `content`    | `""`     |
//! | `order`      | `0`      |
//! | `isPinned`   | `false`  |
//! | `achievedAt` | unachieved |
//!
//! A document without `id`, `userId` or `createdAt` cannot be upgraded.

use super::{OrderKey, OwnerId, PersistedTaskData, Task, TaskContent, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a stored document cannot be mapped to a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordUpgradeError {
    /// The document has no identifier.
    #[error("stored task record has no id")]
    MissingId,

    /// The document has no usable owner.
    #[error("stored task record {0} has no owner")]
    MissingOwner(TaskId),

    /// The document has no creation timestamp.
    #[error("stored task record {0} has no creation timestamp")]
    MissingCreatedAt(TaskId),
}

/// Task document as held by a document store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTaskRecord {
    /// Document identifier.
    #[serde(default)]
    pub id: Option<TaskId>,
    /// Owning user.
    #[serde(default, rename = "userId")]
    pub owner_id: Option<String>,
    /// Task text.
    #[serde(default)]
    pub content: Option<String>,
    /// Order key; `null` for achieved tasks.
    #[serde(default)]
    pub order: Option<i64>,
    /// Pin flag; `null` for achieved tasks.
    #[serde(default, rename = "isPinned")]
    pub pinned: Option<bool>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Achievement timestamp; `null` while unachieved.
    #[serde(default)]
    pub achieved_at: Option<DateTime<Utc>>,
}

impl StoredTaskRecord {
    /// Maps the document onto a valid task, filling in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RecordUpgradeError`] when the identifier, owner or creation
    /// timestamp is missing.
    pub fn upgrade(self) -> Result<Task, RecordUpgradeError> {
        let id = self.id.ok_or(RecordUpgradeError::MissingId)?;
        let owner_id = self
            .owner_id
            .and_then(|raw| OwnerId::new(raw).ok())
            .ok_or(RecordUpgradeError::MissingOwner(id))?;
        let created_at = self
            .created_at
            .ok_or(RecordUpgradeError::MissingCreatedAt(id))?;

        let status = match self.achieved_at {
            Some(achieved_at) => TaskStatus::Achieved { achieved_at },
            None => TaskStatus::Active {
                pinned: self.pinned.unwrap_or(false),
                order: OrderKey::new(self.order.unwrap_or(0)),
            },
        };

        Ok(Task::from_persisted(PersistedTaskData {
            id,
            owner_id,
            content: TaskContent::from_persisted(self.content.unwrap_or_default()),
            status,
            created_at,
        }))
    }
}

impl From<&Task> for StoredTaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id()),
            owner_id: Some(task.owner_id().as_str().to_owned()),
            content: Some(task.content().as_str().to_owned()),
            order: task.order().map(OrderKey::value),
            pinned: task.pinned(),
            created_at: Some(task.created_at()),
            achieved_at: task.achieved_at(),
        }
    }
}
