//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use todo_diaries::task::{
    adapters::memory::{InMemoryTaskRepository, StaticIdentity},
    domain::{OrderKey, OwnerId, Partition, StoredTaskRecord, Task},
    services::TaskOrderingEngine,
};

/// Engine type used across integration tests.
pub type TestEngine = TaskOrderingEngine<InMemoryTaskRepository, StaticIdentity, DefaultClock>;

/// Engine and the repository behind it, signed in as one owner.
pub struct Workspace {
    pub engine: TestEngine,
    pub repository: InMemoryTaskRepository,
    pub owner: OwnerId,
}

/// Provides a signed-in engine over an empty in-memory store.
///
/// # Panics
///
/// Panics if the fixed owner identifier is rejected.
#[fixture]
pub fn workspace() -> Workspace {
    let owner = OwnerId::new("diarist").expect("valid owner id");
    let repository = InMemoryTaskRepository::new();
    let engine = TaskOrderingEngine::new(
        Arc::new(repository.clone()),
        Arc::new(StaticIdentity::signed_in(owner.clone())),
        Arc::new(DefaultClock),
    );
    Workspace {
        engine,
        repository,
        owner,
    }
}

/// Parses an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if the timestamp is malformed.
pub fn at(rfc3339: &str) -> Result<DateTime<Utc>, eyre::Report> {
    Ok(DateTime::parse_from_rfc3339(rfc3339)?.with_timezone(&Utc))
}

/// Seeds a task through its stored document form, as an import would.
///
/// # Errors
///
/// Returns an error if the document does not upgrade or cannot be stored.
pub fn seed_document(
    workspace: &Workspace,
    document: serde_json::Value,
) -> Result<Task, eyre::Report> {
    let record: StoredTaskRecord = serde_json::from_value(document)?;
    let task = record.upgrade()?;
    workspace.repository.seed(task.clone())?;
    Ok(task)
}

/// Lists the order keys of a partition in display order.
///
/// # Errors
///
/// Returns an error if the partition cannot be listed.
pub async fn order_keys(
    workspace: &Workspace,
    partition: Partition,
) -> Result<Vec<i64>, eyre::Report> {
    let tasks = workspace.engine.list_partition(partition, None).await?;
    Ok(tasks
        .iter()
        .filter_map(|task| task.order().map(OrderKey::value))
        .collect())
}

/// Lists the contents of a partition in display order.
///
/// # Errors
///
/// Returns an error if the partition cannot be listed.
pub async fn contents(
    workspace: &Workspace,
    partition: Partition,
) -> Result<Vec<String>, eyre::Report> {
    let tasks = workspace.engine.list_partition(partition, None).await?;
    Ok(tasks
        .iter()
        .map(|task| task.content().as_str().to_owned())
        .collect())
}
