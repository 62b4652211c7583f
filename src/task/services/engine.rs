//! Ordering engine: create, edit, move and delete tasks.
//!
//! Each operation reads at most one partition extreme through the
//! allocator and then performs a single durable write. A failure before
//! the write leaves the store untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use thiserror::Error;

use super::{
    allocator::{AllocationFailure, OrderKeyAllocator},
    echo::ConfirmedSnapshots,
};
use crate::task::{
    config::OrderingConfig,
    domain::{
        OrderEdge, OwnerId, Partition, TargetState, Task, TaskChanges, TaskContent,
        TaskDomainError, TaskDraft, TaskId, TaskStatus, TransitionPlan, plan_transition,
    },
    ports::{IdentityProvider, RankedQuery, SortDirection, TaskRepository, TaskRepositoryError},
};

/// Service-level errors for ordering operations.
#[derive(Debug, Error)]
pub enum TaskOrderingError {
    /// Content or state validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// No owner is signed in.
    #[error("no signed-in owner")]
    Unauthenticated,

    /// A required order key could not be allocated.
    #[error(transparent)]
    Allocation(#[from] AllocationFailure),

    /// The task does not exist or is not visible to the owner.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store rejected a create or update.
    #[error("failed to write task: {0}")]
    WriteFailed(#[source] TaskRepositoryError),

    /// The store rejected a delete.
    #[error("failed to delete task {id}: {source}")]
    DeleteFailed {
        /// Task that was being deleted.
        id: TaskId,
        /// Underlying repository error.
        #[source]
        source: TaskRepositoryError,
    },

    /// A list read or subscription could not be served.
    #[error("failed to read tasks: {0}")]
    ReadFailed(#[source] TaskRepositoryError),
}

/// Result type for ordering engine operations.
pub type TaskOrderingResult<T> = Result<T, TaskOrderingError>;

/// Request payload for editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTaskRequest {
    task_id: TaskId,
    content: String,
    pinned: bool,
    achieved: bool,
    achieved_at: Option<DateTime<Utc>>,
}

impl EditTaskRequest {
    /// Creates an edit request.
    ///
    /// `pinned` is ignored when `achieved` is set.
    #[must_use]
    pub fn new(task_id: TaskId, content: impl Into<String>, pinned: bool, achieved: bool) -> Self {
        Self {
            task_id,
            content: content.into(),
            pinned,
            achieved,
            achieved_at: None,
        }
    }

    /// Sets the achievement timestamp used when `achieved` is set.
    ///
    /// Without it, an already achieved task keeps its timestamp and a newly
    /// achieved one is stamped with the engine clock.
    #[must_use]
    pub const fn with_achieved_at(mut self, achieved_at: DateTime<Utc>) -> Self {
        self.achieved_at = Some(achieved_at);
        self
    }

    /// Returns the task being edited.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }
}

/// Orchestrates allocation, transition planning and writes against the
/// task repository.
#[derive(Clone)]
pub struct TaskOrderingEngine<R, I, C>
where
    R: TaskRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    identity: Arc<I>,
    clock: Arc<C>,
    allocator: OrderKeyAllocator<R>,
    config: OrderingConfig,
}

impl<R, I, C> TaskOrderingEngine<R, I, C>
where
    R: TaskRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    /// Creates an engine with default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, identity: Arc<I>, clock: Arc<C>) -> Self {
        Self::with_config(repository, identity, clock, OrderingConfig::default())
    }

    /// Creates an engine with custom configuration.
    #[must_use]
    pub fn with_config(
        repository: Arc<R>,
        identity: Arc<I>,
        clock: Arc<C>,
        config: OrderingConfig,
    ) -> Self {
        let allocator = OrderKeyAllocator::new(Arc::clone(&repository), &config);
        Self {
            repository,
            identity,
            clock,
            allocator,
            config,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &OrderingConfig {
        &self.config
    }

    /// Creates an unachieved task at the end of its list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Unauthenticated`],
    /// [`TaskOrderingError::Validation`] for empty or over-long content,
    /// [`TaskOrderingError::Allocation`] when no key can be allocated, or
    /// [`TaskOrderingError::WriteFailed`].
    pub async fn create_active_task(
        &self,
        content: impl Into<String>,
        pinned: bool,
    ) -> TaskOrderingResult<TaskId> {
        let owner_id = self.require_owner().await?;
        let result = self.create_active(&owner_id, content.into(), pinned).await;
        log_outcome(&result, &owner_id, "create active task");
        result
    }

    async fn create_active(
        &self,
        owner_id: &OwnerId,
        raw_content: String,
        pinned: bool,
    ) -> TaskOrderingResult<TaskId> {
        let content = TaskContent::new(raw_content)?;
        let partition = Partition::resolve(Some(pinned), None);
        let order = self
            .allocator
            .allocate(owner_id, partition, OrderEdge::Max)
            .await?;
        self.insert(TaskDraft {
            owner_id: owner_id.clone(),
            content,
            status: TaskStatus::Active { pinned, order },
        })
        .await
    }

    /// Creates a task that is already achieved. No order key is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Unauthenticated`],
    /// [`TaskOrderingError::Validation`], or
    /// [`TaskOrderingError::WriteFailed`].
    pub async fn create_achieved_task(
        &self,
        content: impl Into<String>,
        achieved_at: DateTime<Utc>,
    ) -> TaskOrderingResult<TaskId> {
        let owner_id = self.require_owner().await?;
        let result = match TaskContent::new(content) {
            Ok(validated) => {
                self.insert(TaskDraft {
                    owner_id: owner_id.clone(),
                    content: validated,
                    status: TaskStatus::Achieved { achieved_at },
                })
                .await
            }
            Err(err) => Err(err.into()),
        };
        log_outcome(&result, &owner_id, "create achieved task");
        result
    }

    /// Applies content, pin and achievement changes in one write.
    ///
    /// Moving into the pinned list appends at its end; moving into the
    /// unpinned list (by unpinning or un-achieving) prepends at its front.
    /// An edit that keeps the partition changes only content and leaves the
    /// order key untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Unauthenticated`],
    /// [`TaskOrderingError::Validation`], [`TaskOrderingError::NotFound`]
    /// when the task cannot be read, [`TaskOrderingError::Allocation`], or
    /// [`TaskOrderingError::WriteFailed`].
    pub async fn apply_edit(&self, request: EditTaskRequest) -> TaskOrderingResult<TaskId> {
        let owner_id = self.require_owner().await?;
        let result = self.edit(&owner_id, request).await;
        log_outcome(&result, &owner_id, "apply task edit");
        result
    }

    async fn edit(&self, owner_id: &OwnerId, request: EditTaskRequest) -> TaskOrderingResult<TaskId> {
        let EditTaskRequest {
            task_id,
            content: raw_content,
            pinned,
            achieved,
            achieved_at: requested_at,
        } = request;

        let content = TaskContent::new(raw_content)?;
        let current = self.load_owned(owner_id, task_id).await?;
        let achieved_at = requested_at
            .or_else(|| current.achieved_at())
            .unwrap_or_else(|| self.clock.utc());
        let target = TargetState::from_flags(pinned, achieved, achieved_at);
        self.transition(owner_id, &current, content, target).await
    }

    /// Flips the pin flag of an unachieved task, keeping its content.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PinningAchievedTask`] (as
    /// [`TaskOrderingError::Validation`]) for an achieved task, plus the
    /// errors of [`Self::apply_edit`].
    pub async fn toggle_pin(&self, task_id: TaskId) -> TaskOrderingResult<TaskId> {
        let owner_id = self.require_owner().await?;
        let result = self.flip_pin(&owner_id, task_id).await;
        log_outcome(&result, &owner_id, "toggle task pin");
        result
    }

    async fn flip_pin(&self, owner_id: &OwnerId, task_id: TaskId) -> TaskOrderingResult<TaskId> {
        let current = self.load_owned(owner_id, task_id).await?;
        let Some(pinned) = current.pinned() else {
            return Err(TaskDomainError::PinningAchievedTask(task_id).into());
        };
        let content = current.content().clone();
        let target = TargetState::Active { pinned: !pinned };
        self.transition(owner_id, &current, content, target).await
    }

    /// Marks a task achieved now. An already achieved task is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Unauthenticated`],
    /// [`TaskOrderingError::NotFound`], or
    /// [`TaskOrderingError::WriteFailed`].
    pub async fn achieve_now(&self, task_id: TaskId) -> TaskOrderingResult<TaskId> {
        let owner_id = self.require_owner().await?;
        let achieved_at = self.clock.utc();
        let result = self
            .move_if(&owner_id, task_id, is_active, TargetState::Achieved { achieved_at })
            .await;
        log_outcome(&result, &owner_id, "achieve task");
        result
    }

    /// Returns an achieved task to the front of the unpinned list. An
    /// unachieved task is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Unauthenticated`],
    /// [`TaskOrderingError::NotFound`], [`TaskOrderingError::Allocation`],
    /// or [`TaskOrderingError::WriteFailed`].
    pub async fn unachieve(&self, task_id: TaskId) -> TaskOrderingResult<TaskId> {
        let owner_id = self.require_owner().await?;
        let target = TargetState::Active { pinned: false };
        let result = self
            .move_if(&owner_id, task_id, is_achieved, target)
            .await;
        log_outcome(&result, &owner_id, "unachieve task");
        result
    }

    /// Deletes a task unconditionally. Remaining order keys are not
    /// compacted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::DeleteFailed`] when the store rejects
    /// the delete.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskOrderingResult<TaskId> {
        match self.repository.delete(task_id).await {
            Ok(()) => {
                tracing::debug!(%task_id, "deleted task");
                Ok(task_id)
            }
            Err(source) => {
                tracing::warn!(%task_id, error = %source, "failed to delete task");
                Err(TaskOrderingError::DeleteFailed { id: task_id, source })
            }
        }
    }

    /// Reads one of the owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Unauthenticated`] or
    /// [`TaskOrderingError::NotFound`].
    pub async fn find_task(&self, task_id: TaskId) -> TaskOrderingResult<Task> {
        let owner_id = self.require_owner().await?;
        self.load_owned(&owner_id, task_id).await
    }

    /// Lists a partition in display order: ascending by order key for the
    /// active lists, most recently achieved first for the achieved list.
    ///
    /// `limit` defaults to the configured list limit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Unauthenticated`] or
    /// [`TaskOrderingError::ReadFailed`].
    pub async fn list_partition(
        &self,
        partition: Partition,
        limit: Option<usize>,
    ) -> TaskOrderingResult<Vec<Task>> {
        let owner_id = self.require_owner().await?;
        let query = display_query(
            owner_id,
            partition,
            limit.unwrap_or(self.config.list_limit),
        );
        self.repository.find_ranked(&query).await.map_err(|err| {
            tracing::warn!(%partition, error = %err, "failed to list partition");
            TaskOrderingError::ReadFailed(err)
        })
    }

    /// Opens a live view of a partition that skips locally pending echoes.
    ///
    /// Call again to restart a closed view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Unauthenticated`] or
    /// [`TaskOrderingError::ReadFailed`] when the subscription cannot be
    /// opened.
    pub async fn watch_partition(
        &self,
        partition: Partition,
    ) -> TaskOrderingResult<ConfirmedSnapshots> {
        let owner_id = self.require_owner().await?;
        let query = display_query(owner_id, partition, self.config.subscription_limit);
        let subscription = self.repository.subscribe(&query).await.map_err(|err| {
            tracing::warn!(%partition, error = %err, "failed to subscribe to partition");
            TaskOrderingError::ReadFailed(err)
        })?;
        Ok(ConfirmedSnapshots::new(partition, subscription))
    }

    /// Moves a task into `target` when `should_move` holds for its current
    /// state; otherwise succeeds without writing.
    async fn move_if(
        &self,
        owner_id: &OwnerId,
        task_id: TaskId,
        should_move: fn(&Task) -> bool,
        target: TargetState,
    ) -> TaskOrderingResult<TaskId> {
        let current = self.load_owned(owner_id, task_id).await?;
        if !should_move(&current) {
            return Ok(task_id);
        }
        let content = current.content().clone();
        self.transition(owner_id, &current, content, target).await
    }

    async fn require_owner(&self) -> TaskOrderingResult<OwnerId> {
        self.identity.current_owner().await.ok_or_else(|| {
            tracing::warn!("operation attempted without a signed-in owner");
            TaskOrderingError::Unauthenticated
        })
    }

    /// Point-reads a task, hiding read failures and other owners' tasks
    /// behind `NotFound`.
    async fn load_owned(&self, owner_id: &OwnerId, task_id: TaskId) -> TaskOrderingResult<Task> {
        match self.repository.find_by_id(task_id).await {
            Ok(Some(task)) if task.owner_id() == owner_id => Ok(task),
            Ok(_) => Err(TaskOrderingError::NotFound(task_id)),
            Err(err) => {
                tracing::debug!(%task_id, error = %err, "point read failed");
                Err(TaskOrderingError::NotFound(task_id))
            }
        }
    }

    async fn transition(
        &self,
        owner_id: &OwnerId,
        current: &Task,
        content: TaskContent,
        target: TargetState,
    ) -> TaskOrderingResult<TaskId> {
        let task_id = current.id();
        let plan = plan_transition(current, target);
        let status = match plan {
            TransitionPlan::Direct { status, .. } => status,
            TransitionPlan::Allocate { pinned, edge, .. } => {
                let order = self
                    .allocator
                    .allocate(owner_id, Partition::active(pinned), edge)
                    .await?;
                TaskStatus::Active { pinned, order }
            }
        };

        self.repository
            .update(task_id, &TaskChanges { content, status })
            .await
            .map_err(|err| match err {
                TaskRepositoryError::NotFound(id) => TaskOrderingError::NotFound(id),
                other => TaskOrderingError::WriteFailed(other),
            })?;
        tracing::debug!(
            %task_id,
            from = %plan.from(),
            to = %plan.to(),
            order = ?status.order().map(|key| key.value()),
            "updated task"
        );
        Ok(task_id)
    }

    async fn insert(&self, draft: TaskDraft) -> TaskOrderingResult<TaskId> {
        let task = self
            .repository
            .insert(&draft)
            .await
            .map_err(TaskOrderingError::WriteFailed)?;
        tracing::debug!(
            task_id = %task.id(),
            partition = %task.partition(),
            order = ?task.order().map(|key| key.value()),
            "created task"
        );
        Ok(task.id())
    }
}

fn is_active(task: &Task) -> bool {
    task.achieved_at().is_none()
}

fn is_achieved(task: &Task) -> bool {
    task.achieved_at().is_some()
}

fn display_query(owner_id: OwnerId, partition: Partition, limit: usize) -> RankedQuery {
    let direction = if partition.is_ordered() {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    RankedQuery::new(owner_id, partition, direction, limit)
}

fn log_outcome(result: &TaskOrderingResult<TaskId>, owner_id: &OwnerId, operation: &str) {
    if let Err(err) = result {
        tracing::warn!(%owner_id, operation, error = %err, "task operation failed");
    }
}
