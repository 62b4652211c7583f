//! Ordering behaviour across complete task journeys.

use std::sync::Arc;

use super::helpers::{Workspace, at, contents, order_keys, seed_document, workspace};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use todo_diaries::task::{
    adapters::memory::StaticIdentity,
    config::OrderingConfig,
    domain::{OrderKey, Partition, TaskId},
    services::{EditTaskRequest, TaskOrderingEngine, TaskOrderingError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_journey_keeps_lists_ordered(workspace: Workspace) -> Result<(), eyre::Report> {
    let engine = &workspace.engine;
    let milk = engine.create_active_task("buy milk", false).await?;
    let dog = engine.create_active_task("walk dog", false).await?;
    let rent = engine.create_active_task("pay rent", true).await?;

    engine.toggle_pin(dog).await?;
    eyre::ensure!(
        contents(&workspace, Partition::PinnedActive).await? == ["pay rent", "walk dog"],
        "pinned task should append after existing pins"
    );

    engine.achieve_now(rent).await?;
    engine.toggle_pin(dog).await?;
    eyre::ensure!(
        contents(&workspace, Partition::UnpinnedActive).await? == ["walk dog", "buy milk"],
        "unpinned task should land at the front"
    );

    engine.unachieve(rent).await?;
    let keys = order_keys(&workspace, Partition::UnpinnedActive).await?;
    eyre::ensure!(keys == [-200, -100, 0], "unexpected unpinned keys {keys:?}");
    eyre::ensure!(
        contents(&workspace, Partition::UnpinnedActive).await?.first().map(String::as_str)
            == Some("pay rent"),
        "un-achieved task should be shown first"
    );

    let achieved = engine.list_partition(Partition::Achieved, None).await?;
    eyre::ensure!(achieved.is_empty(), "no task should remain achieved");
    eyre::ensure!(
        engine.find_task(milk).await?.order() == Some(OrderKey::BASELINE),
        "untouched task keeps its key"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_moves_achieved_task_into_pinned_list(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let engine = &workspace.engine;
    engine.create_active_task("first pin", true).await?;
    engine.create_active_task("second pin", true).await?;
    let done = engine
        .create_achieved_task("done", at("2024-03-01T12:00:00Z")?)
        .await?;

    engine
        .apply_edit(EditTaskRequest::new(done, "done, again", true, false))
        .await?;

    let task = engine.find_task(done).await?;
    eyre::ensure!(task.partition() == Partition::PinnedActive, "task should be pinned");
    eyre::ensure!(task.order() == Some(OrderKey::new(200)), "task should append");
    eyre::ensure!(task.content().as_str() == "done, again", "content should change");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_gap_spaces_new_tasks(workspace: Workspace) -> Result<(), eyre::Report> {
    let config = OrderingConfig::from_toml_str("[ordering]\norder_gap = 10\nbaseline_key = 5\n")?;
    let engine = TaskOrderingEngine::with_config(
        Arc::new(workspace.repository.clone()),
        Arc::new(StaticIdentity::signed_in(workspace.owner.clone())),
        Arc::new(DefaultClock),
        config,
    );

    for content in ["one", "two", "three"] {
        engine.create_active_task(content, false).await?;
    }

    let keys = order_keys(&workspace, Partition::UnpinnedActive).await?;
    eyre::ensure!(keys == [5, 15, 25], "unexpected keys {keys:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_documents_join_the_lists(workspace: Workspace) -> Result<(), eyre::Report> {
    seed_document(
        &workspace,
        json!({
            "id": TaskId::new(),
            "userId": "diarist",
            "content": "imported",
            "createdAt": "2023-11-02T09:00:00Z",
        }),
    )?;
    seed_document(
        &workspace,
        json!({
            "id": TaskId::new(),
            "userId": "diarist",
            "content": "old win",
            "order": 700,
            "isPinned": true,
            "createdAt": "2023-11-02T09:00:00Z",
            "achievedAt": "2023-11-03T09:00:00Z",
        }),
    )?;

    workspace.engine.create_active_task("new", false).await?;

    eyre::ensure!(
        contents(&workspace, Partition::UnpinnedActive).await? == ["imported", "new"],
        "legacy task should default to the baseline key"
    );
    eyre::ensure!(
        contents(&workspace, Partition::Achieved).await? == ["old win"],
        "achieved legacy task ignores its stale pin"
    );
    eyre::ensure!(
        order_keys(&workspace, Partition::PinnedActive).await?.is_empty(),
        "pinned list should stay empty"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn offline_store_rejects_writes_without_partial_state(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let dog = workspace.engine.create_active_task("walk dog", false).await?;
    workspace.repository.set_online(false)?;

    let create = workspace.engine.create_active_task("buy milk", true).await;
    let pin = workspace.engine.toggle_pin(dog).await;

    workspace.repository.set_online(true)?;
    eyre::ensure!(
        matches!(create, Err(TaskOrderingError::Allocation(_))),
        "create should fail during allocation, got {create:?}"
    );
    eyre::ensure!(
        matches!(pin, Err(TaskOrderingError::NotFound(_))),
        "point read failure should surface as not found, got {pin:?}"
    );
    eyre::ensure!(workspace.repository.len()? == 1, "no task should be added");
    eyre::ensure!(
        workspace.engine.find_task(dog).await?.pinned() == Some(false),
        "task should be unchanged"
    );
    Ok(())
}
