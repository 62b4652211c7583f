//! Monthly achievement tallies over stored tasks.

use std::sync::Arc;

use super::helpers::{Workspace, at, workspace};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::rstest;
use todo_diaries::task::{
    adapters::memory::StaticIdentity, config::OrderingConfig, services::AchievementStatsService,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tally_counts_achievements_per_day(workspace: Workspace) -> Result<(), eyre::Report> {
    let engine = &workspace.engine;
    engine
        .create_achieved_task("morning run", at("2024-02-29T07:00:00Z")?)
        .await?;
    engine
        .create_achieved_task("evening run", at("2024-02-29T19:00:00Z")?)
        .await?;
    engine
        .create_achieved_task("march run", at("2024-03-01T00:00:00Z")?)
        .await?;
    engine.create_active_task("tomorrow's run", false).await?;

    let stats = AchievementStatsService::new(
        Arc::new(workspace.repository.clone()),
        Arc::new(StaticIdentity::signed_in(workspace.owner.clone())),
        Arc::new(DefaultClock),
        &OrderingConfig::default(),
    );
    let february = stats.monthly_tally(2024, 2).await?;

    let leap_day =
        NaiveDate::from_ymd_opt(2024, 2, 29).ok_or_else(|| eyre::eyre!("invalid date"))?;
    eyre::ensure!(february.days.len() == 29, "leap February has 29 days");
    eyre::ensure!(february.total == 2, "expected two achievements, got {}", february.total);
    eyre::ensure!(february.count_on(leap_day) == 2, "both runs fall on the leap day");
    Ok(())
}
