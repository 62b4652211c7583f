//! Domain model for ordered task lists.
//!
//! The domain covers task content validation, partition resolution, sparse
//! order keys, transition planning and monthly achievement statistics. All
//! of it is pure; storage and identity live behind the ports.

mod content;
mod error;
mod ids;
mod order;
mod partition;
mod record;
mod stats;
mod task;
mod transition;

pub use content::TaskContent;
pub use error::{ParsePartitionError, TaskDomainError};
pub use ids::{OwnerId, TaskId};
pub use order::{OrderEdge, OrderGap, OrderKey};
pub use partition::Partition;
pub use record::{RecordUpgradeError, StoredTaskRecord};
pub use stats::{AchievementMonth, DailyAchievements, MonthlyAchievements};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskDraft, TaskStatus};
pub use transition::{TargetState, TransitionPlan, entry_edge, plan_transition};
