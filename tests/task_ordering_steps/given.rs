//! Given steps for ordered task list scenarios.

use super::world::{OrderingWorld, parse_order, run_async};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use todo_diaries::task::domain::{
    OrderKey, Partition, PersistedTaskData, Task, TaskContent, TaskId, TaskStatus,
};

fn seed(world: &mut OrderingWorld, name: String, status: TaskStatus) -> Result<(), eyre::Report> {
    let task = Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        owner_id: world.owner.clone(),
        content: TaskContent::new(name.clone()).wrap_err("seed task content")?,
        status,
        created_at: Utc::now(),
    });
    let id = task.id();
    world.repository.seed(task).wrap_err("seed task")?;
    world.tasks.insert(name, id);
    Ok(())
}

#[given("a signed-in owner with no tasks")]
fn signed_in_owner(world: &mut OrderingWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.repository.is_empty()?,
        "scenario world should start with an empty store"
    );
    Ok(())
}

#[given(r#"an unpinned task "{name}" with order "{order}""#)]
fn unpinned_task(world: &mut OrderingWorld, name: String, order: String) -> Result<(), eyre::Report> {
    let key = OrderKey::new(parse_order(&order)?);
    seed(world, name, TaskStatus::Active { pinned: false, order: key })
}

#[given(r#"a pinned task "{name}" with order "{order}""#)]
fn pinned_task(world: &mut OrderingWorld, name: String, order: String) -> Result<(), eyre::Report> {
    let key = OrderKey::new(parse_order(&order)?);
    seed(world, name, TaskStatus::Active { pinned: true, order: key })
}

#[given(r#"an achieved task "{name}""#)]
fn achieved_task(world: &mut OrderingWorld, name: String) -> Result<(), eyre::Report> {
    let achieved_at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
        .wrap_err("parse achievement timestamp")?
        .with_timezone(&Utc);
    seed(world, name, TaskStatus::Achieved { achieved_at })
}

#[given("the owner watches the pinned list")]
fn watch_pinned_list(world: &mut OrderingWorld) -> Result<(), eyre::Report> {
    let mut view = run_async(world.engine.watch_partition(Partition::PinnedActive))
        .wrap_err("open pinned view")?;
    view.try_next()
        .ok_or_else(|| eyre::eyre!("pinned view delivered no initial snapshot"))?;
    world.pinned_view = Some(view);
    Ok(())
}
