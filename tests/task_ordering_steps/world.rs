//! Shared world state for ordered task list BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use todo_diaries::task::{
    adapters::memory::{InMemoryTaskRepository, StaticIdentity},
    domain::{OwnerId, Task, TaskId},
    services::{ConfirmedSnapshots, TaskOrderingEngine, TaskOrderingError},
};

/// Engine type used by the BDD world.
pub type TestEngine = TaskOrderingEngine<InMemoryTaskRepository, StaticIdentity, DefaultClock>;

/// Scenario world for ordering behaviour tests.
pub struct OrderingWorld {
    pub engine: TestEngine,
    pub repository: InMemoryTaskRepository,
    pub owner: OwnerId,
    pub tasks: HashMap<String, TaskId>,
    pub last_result: Option<Result<TaskId, TaskOrderingError>>,
    pub pinned_view: Option<ConfirmedSnapshots>,
}

impl OrderingWorld {
    /// Creates a world signed in as a fixed owner over an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the fixed owner identifier is rejected.
    #[must_use]
    pub fn new() -> Self {
        let owner = OwnerId::new("scenario-owner").expect("valid owner id");
        let repository = InMemoryTaskRepository::new();
        let engine = TaskOrderingEngine::new(
            Arc::new(repository.clone()),
            Arc::new(StaticIdentity::signed_in(owner.clone())),
            Arc::new(DefaultClock),
        );
        Self {
            engine,
            repository,
            owner,
            tasks: HashMap::new(),
            last_result: None,
            pinned_view: None,
        }
    }

    /// Resolves a task name used in the scenario to its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if no task with that name was created.
    pub fn task_id(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task named {name:?} in scenario world"))
    }

    /// Reads a named task back through the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or the task cannot be read.
    pub fn task(&self, name: &str) -> Result<Task, eyre::Report> {
        let id = self.task_id(name)?;
        Ok(run_async(self.engine.find_task(id))?)
    }
}

impl Default for OrderingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> OrderingWorld {
    OrderingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses an order key written as a quoted step argument.
///
/// # Errors
///
/// Returns an error if the text is not an integer.
pub fn parse_order(raw: &str) -> Result<i64, eyre::Report> {
    raw.trim()
        .parse()
        .map_err(|err| eyre::eyre!("invalid order key {raw:?}: {err}"))
}
