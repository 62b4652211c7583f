//! Port contracts for ordered task lists.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod identity;
pub mod repository;
pub mod subscription;

pub use identity::IdentityProvider;
pub use repository::{
    RankedQuery, SortDirection, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};
pub use subscription::{PartitionSnapshot, SnapshotOrigin, TaskSubscription};
