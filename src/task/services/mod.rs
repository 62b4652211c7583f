//! Application services for ordered task lists.

mod allocator;
mod echo;
mod engine;
mod stats;

pub use allocator::{AllocationFailure, OrderKeyAllocator};
pub use echo::{ConfirmedSnapshots, confirmed_tasks};
pub use engine::{EditTaskRequest, TaskOrderingEngine, TaskOrderingError, TaskOrderingResult};
pub use stats::{
    AchievementStatsError, AchievementStatsResult, AchievementStatsService,
    CurrentMonthAchievements,
};
