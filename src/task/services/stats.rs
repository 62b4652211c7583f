//! Monthly achievement statistics.

use std::fmt;
use std::sync::Arc;

use chrono::FixedOffset;
use mockable::Clock;
use thiserror::Error;

use super::ConfirmedSnapshots;
use crate::task::{
    config::OrderingConfig,
    domain::{
        AchievementMonth, MonthlyAchievements, OwnerId, Partition, Task, TaskDomainError,
    },
    ports::{IdentityProvider, RankedQuery, SortDirection, TaskRepository, TaskRepositoryError},
};

/// Service-level errors for achievement statistics.
#[derive(Debug, Error)]
pub enum AchievementStatsError {
    /// The requested month is invalid.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// No owner is signed in.
    #[error("no signed-in owner")]
    Unauthenticated,

    /// The achieved tasks could not be read.
    #[error("failed to read achieved tasks: {0}")]
    ReadFailed(#[source] TaskRepositoryError),
}

/// Result type for achievement statistics operations.
pub type AchievementStatsResult<T> = Result<T, AchievementStatsError>;

/// Computes per-day achievement counts for the signed-in owner.
#[derive(Clone)]
pub struct AchievementStatsService<R, I, C>
where
    R: TaskRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    identity: Arc<I>,
    clock: Arc<C>,
    limit: usize,
    offset: FixedOffset,
}

impl<R, I, C> AchievementStatsService<R, I, C>
where
    R: TaskRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    /// Creates a statistics service reading at most
    /// `config.stats_limit` tasks per month and drawing day boundaries at
    /// `config.stats_utc_offset`.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        identity: Arc<I>,
        clock: Arc<C>,
        config: &OrderingConfig,
    ) -> Self {
        Self {
            repository,
            identity,
            clock,
            limit: config.stats_limit,
            offset: config.stats_utc_offset,
        }
    }

    /// Tallies achievements for a given month (1-based) in the configured
    /// calendar offset.
    ///
    /// # Errors
    ///
    /// Returns [`AchievementStatsError::Domain`] for an invalid month,
    /// [`AchievementStatsError::Unauthenticated`], or
    /// [`AchievementStatsError::ReadFailed`].
    pub async fn monthly_tally(
        &self,
        year: i32,
        month: u32,
    ) -> AchievementStatsResult<MonthlyAchievements> {
        let achievement_month = AchievementMonth::in_offset(year, month, self.offset)?;
        self.tally(achievement_month).await
    }

    /// Tallies achievements for the month containing the clock's "now".
    ///
    /// # Errors
    ///
    /// Returns [`AchievementStatsError::Unauthenticated`] or
    /// [`AchievementStatsError::ReadFailed`].
    pub async fn current_month_tally(&self) -> AchievementStatsResult<MonthlyAchievements> {
        self.tally(AchievementMonth::containing(self.clock.utc(), self.offset))
            .await
    }

    /// Opens a live tally of the current month that refreshes whenever the
    /// achieved list changes.
    ///
    /// # Errors
    ///
    /// Returns [`AchievementStatsError::Unauthenticated`] or
    /// [`AchievementStatsError::ReadFailed`] if the subscription cannot be
    /// opened.
    pub async fn watch_current_month(&self) -> AchievementStatsResult<CurrentMonthAchievements<C>> {
        let owner_id = self.require_owner().await?;
        let query = RankedQuery::new(
            owner_id,
            Partition::Achieved,
            SortDirection::Descending,
            self.limit,
        );
        let subscription = self.repository.subscribe(&query).await.map_err(|err| {
            tracing::warn!(error = %err, "failed to subscribe to achieved tasks");
            AchievementStatsError::ReadFailed(err)
        })?;
        Ok(CurrentMonthAchievements {
            snapshots: ConfirmedSnapshots::new(Partition::Achieved, subscription),
            clock: Arc::clone(&self.clock),
            offset: self.offset,
        })
    }

    async fn require_owner(&self) -> AchievementStatsResult<OwnerId> {
        self.identity
            .current_owner()
            .await
            .ok_or(AchievementStatsError::Unauthenticated)
    }

    async fn tally(&self, month: AchievementMonth) -> AchievementStatsResult<MonthlyAchievements> {
        let owner_id = self.require_owner().await?;
        let tasks = self
            .repository
            .find_achieved_between(&owner_id, month.start(), month.end(), self.limit)
            .await
            .map_err(|err| {
                tracing::warn!(%owner_id, error = %err, "failed to read achieved tasks");
                AchievementStatsError::ReadFailed(err)
            })?;
        tracing::debug!(
            %owner_id,
            year = month.year(),
            month = month.month(),
            count = tasks.len(),
            "read achieved tasks"
        );
        Ok(MonthlyAchievements::tally(
            month,
            tasks.iter().filter_map(Task::achieved_at),
        ))
    }
}

/// Live tally of the current month.
///
/// Each confirmed change to the achieved list yields a fresh tally. The
/// month is re-read from the clock per snapshot so the view rolls over at
/// local midnight on the 1st.
pub struct CurrentMonthAchievements<C> {
    snapshots: ConfirmedSnapshots,
    clock: Arc<C>,
    offset: FixedOffset,
}

impl<C> fmt::Debug for CurrentMonthAchievements<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentMonthAchievements")
            .field("snapshots", &self.snapshots)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl<C> CurrentMonthAchievements<C>
where
    C: Clock + Send + Sync,
{
    /// Waits for the next confirmed change and tallies it.
    ///
    /// Returns `None` once the underlying subscription closes.
    pub async fn next(&mut self) -> Option<MonthlyAchievements> {
        let tasks = self.snapshots.next().await?;
        Some(self.tally(&tasks))
    }

    /// Tallies the next confirmed change already queued, without waiting.
    pub fn try_next(&mut self) -> Option<MonthlyAchievements> {
        let tasks = self.snapshots.try_next()?;
        Some(self.tally(&tasks))
    }

    fn tally(&self, tasks: &[Task]) -> MonthlyAchievements {
        let month = AchievementMonth::containing(self.clock.utc(), self.offset);
        MonthlyAchievements::tally(month, tasks.iter().filter_map(Task::achieved_at))
    }
}
