//! Live partition views over the in-memory store.

use std::sync::Arc;

use super::helpers::{Workspace, workspace};
use mockable::DefaultClock;
use rstest::rstest;
use todo_diaries::task::{
    adapters::memory::StaticIdentity,
    domain::{OwnerId, Partition},
    ports::{RankedQuery, SnapshotOrigin, SortDirection, TaskRepository},
    services::TaskOrderingEngine,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn raw_subscription_sees_pending_echo_first(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let query = RankedQuery::new(
        workspace.owner.clone(),
        Partition::UnpinnedActive,
        SortDirection::Ascending,
        10,
    );
    let mut subscription = workspace.repository.subscribe(&query).await?;
    let initial = subscription
        .try_next()
        .ok_or_else(|| eyre::eyre!("missing initial snapshot"))?;
    eyre::ensure!(initial.origin == SnapshotOrigin::Confirmed, "initial snapshot is confirmed");

    workspace.engine.create_active_task("walk dog", false).await?;

    let origins: Vec<SnapshotOrigin> = std::iter::from_fn(|| subscription.try_next())
        .map(|snapshot| snapshot.origin)
        .collect();
    eyre::ensure!(
        origins == [SnapshotOrigin::LocalPending, SnapshotOrigin::Confirmed],
        "unexpected snapshot sequence {origins:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn confirmed_view_renders_each_write_once(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let mut view = workspace
        .engine
        .watch_partition(Partition::UnpinnedActive)
        .await?;
    view.next()
        .await
        .ok_or_else(|| eyre::eyre!("missing initial snapshot"))?;

    let dog = workspace.engine.create_active_task("walk dog", false).await?;
    workspace.engine.create_active_task("buy milk", false).await?;
    workspace.engine.delete_task(dog).await?;

    let rendered: Vec<Vec<String>> = std::iter::from_fn(|| view.try_next())
        .map(|tasks| {
            tasks
                .iter()
                .map(|task| task.content().as_str().to_owned())
                .collect()
        })
        .collect();
    eyre::ensure!(
        rendered
            == [
                vec!["walk dog".to_owned()],
                vec!["walk dog".to_owned(), "buy milk".to_owned()],
                vec!["buy milk".to_owned()],
            ],
        "unexpected renders {rendered:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn other_owners_writes_are_not_delivered(workspace: Workspace) -> Result<(), eyre::Report> {
    let stranger = TaskOrderingEngine::new(
        Arc::new(workspace.repository.clone()),
        Arc::new(StaticIdentity::signed_in(OwnerId::new("neighbour")?)),
        Arc::new(DefaultClock),
    );
    let mut view = workspace
        .engine
        .watch_partition(Partition::PinnedActive)
        .await?;
    view.try_next()
        .ok_or_else(|| eyre::eyre!("missing initial snapshot"))?;

    stranger.create_active_task("their task", true).await?;

    eyre::ensure!(view.try_next().is_none(), "foreign writes must not reach the view");
    eyre::ensure!(
        workspace
            .engine
            .list_partition(Partition::PinnedActive, None)
            .await?
            .is_empty(),
        "foreign tasks must not be listed"
    );
    Ok(())
}
