//! In-memory task repository with live subscriptions.
//!
//! Every write publishes two snapshots to each affected subscriber: one
//! flagged [`SnapshotOrigin::LocalPending`] straight away, then one flagged
//! [`SnapshotOrigin::Confirmed`]. This mirrors document stores with latency
//! compensation, where the writer sees its own change before the server
//! acknowledges it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::UnboundedSender;

use crate::task::{
    domain::{OwnerId, Partition, PersistedTaskData, Task, TaskChanges, TaskDraft, TaskId},
    ports::{
        PartitionSnapshot, RankedQuery, SnapshotOrigin, SortDirection, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult, TaskSubscription,
    },
};

/// Thread-safe in-memory task repository.
pub struct InMemoryTaskRepository<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<C>,
}

struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    subscribers: Vec<Subscriber>,
    online: bool,
}

impl Default for InMemoryTaskState {
    fn default() -> Self {
        Self {
            tasks: HashMap::new(),
            subscribers: Vec::new(),
            online: true,
        }
    }
}

struct Subscriber {
    query: RankedQuery,
    sender: UnboundedSender<PartitionSnapshot>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty repository stamping creation times from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
        }
    }

    /// Simulates connectivity changes. While offline every operation fails
    /// with [`TaskRepositoryError::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] if the state lock is
    /// poisoned.
    pub fn set_online(&self, online: bool) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.online = online;
        Ok(())
    }

    /// Stores a task exactly as given, bypassing identifier and timestamp
    /// assignment. Used to seed fixtures and imported records.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] if the state lock is
    /// poisoned.
    pub fn seed(&self, task: Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let owner_id = task.owner_id().clone();
        let partition = task.partition();
        let replaced = state.tasks.insert(task.id(), task);
        match replaced {
            Some(previous) if previous.owner_id() != &owner_id => {
                publish(&mut state, previous.owner_id(), &[previous.partition()]);
                publish(&mut state, &owner_id, &[partition]);
            }
            Some(previous) => publish(&mut state, &owner_id, &[previous.partition(), partition]),
            None => publish(&mut state, &owner_id, &[partition]),
        }
        Ok(())
    }

    /// Returns the number of stored tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] if the state lock is
    /// poisoned.
    pub fn len(&self) -> TaskRepositoryResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.len())
    }

    /// Returns `true` when no tasks are stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] if the state lock is
    /// poisoned.
    pub fn is_empty(&self) -> TaskRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<C> Clone for InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskRepository").finish_non_exhaustive()
    }
}

fn poisoned<E: fmt::Display>(err: E) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn ensure_online(state: &InMemoryTaskState) -> TaskRepositoryResult<()> {
    if state.online {
        Ok(())
    } else {
        Err(TaskRepositoryError::Unavailable)
    }
}

/// Orders two tasks of the same partition by their natural key, falling
/// back to creation time and identifier so ties sort deterministically.
fn natural_order(left: &Task, right: &Task) -> Ordering {
    let primary = match (left.order(), right.order()) {
        (Some(l), Some(r)) => l.cmp(&r),
        _ => left.achieved_at().cmp(&right.achieved_at()),
    };
    primary
        .then_with(|| left.created_at().cmp(&right.created_at()))
        .then_with(|| left.id().cmp(&right.id()))
}

fn ranked(state: &InMemoryTaskState, query: &RankedQuery) -> Vec<Task> {
    let mut tasks: Vec<Task> = state
        .tasks
        .values()
        .filter(|task| query.matches(task))
        .cloned()
        .collect();
    tasks.sort_by(|left, right| match query.direction {
        SortDirection::Ascending => natural_order(left, right),
        SortDirection::Descending => natural_order(right, left),
    });
    tasks.truncate(query.limit);
    tasks
}

/// Sends pending then confirmed snapshots to subscribers watching any of
/// the touched partitions, dropping subscribers whose receiver is gone.
fn publish(state: &mut InMemoryTaskState, owner_id: &OwnerId, touched: &[Partition]) {
    let subscribers = std::mem::take(&mut state.subscribers);
    let mut retained = Vec::with_capacity(subscribers.len());
    for subscriber in subscribers {
        let affected = &subscriber.query.owner_id == owner_id
            && touched.contains(&subscriber.query.partition);
        if !affected {
            retained.push(subscriber);
            continue;
        }
        let tasks = ranked(state, &subscriber.query);
        let delivered = [SnapshotOrigin::LocalPending, SnapshotOrigin::Confirmed]
            .into_iter()
            .all(|origin| {
                subscriber
                    .sender
                    .send(PartitionSnapshot::new(tasks.clone(), origin))
                    .is_ok()
            });
        if delivered {
            retained.push(subscriber);
        }
    }
    state.subscribers = retained;
}

#[async_trait]
impl<C> TaskRepository for InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn insert(&self, draft: &TaskDraft) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(poisoned)?;
        ensure_online(&state)?;

        let task = Task::from_persisted(PersistedTaskData {
            id: TaskId::new(),
            owner_id: draft.owner_id.clone(),
            content: draft.content.clone(),
            status: draft.status,
            created_at: self.clock.utc(),
        });
        state.tasks.insert(task.id(), task.clone());
        publish(&mut state, &draft.owner_id, &[task.partition()]);
        Ok(task)
    }

    async fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        ensure_online(&state)?;

        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        let before = task.partition();
        task.apply(changes.clone());
        let after = task.partition();
        let owner_id = task.owner_id().clone();
        publish(&mut state, &owner_id, &[before, after]);
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        ensure_online(&state)?;

        if let Some(removed) = state.tasks.remove(&id) {
            publish(&mut state, removed.owner_id(), &[removed.partition()]);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        ensure_online(&state)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_ranked(&self, query: &RankedQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        ensure_online(&state)?;
        Ok(ranked(&state, query))
    }

    async fn find_achieved_between(
        &self,
        owner_id: &OwnerId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        ensure_online(&state)?;

        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.owner_id() == owner_id)
            .filter(|task| {
                task.achieved_at()
                    .is_some_and(|achieved_at| achieved_at >= start && achieved_at < end)
            })
            .cloned()
            .collect();
        tasks.sort_by(natural_order);
        tasks.truncate(limit);
        Ok(tasks)
    }

    async fn subscribe(&self, query: &RankedQuery) -> TaskRepositoryResult<TaskSubscription> {
        let mut state = self.state.write().map_err(poisoned)?;
        ensure_online(&state)?;

        let (sender, subscription) = TaskSubscription::channel();
        let initial = PartitionSnapshot::new(ranked(&state, query), SnapshotOrigin::Confirmed);
        if sender.send(initial).is_ok() {
            state.subscribers.push(Subscriber {
                query: query.clone(),
                sender,
            });
        }
        Ok(subscription)
    }
}
