//! Partition transition planning.
//!
//! A plan is computed purely from the current task and the requested state.
//! Plans that move a task into an active list need a fresh order key, which
//! the caller obtains from the allocator before writing.

use super::{OrderEdge, OrderKey, Partition, Task, TaskStatus};
use chrono::{DateTime, Utc};

/// State requested by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Task should be unachieved, pinned or not.
    Active {
        /// Requested pin flag.
        pinned: bool,
    },
    /// Task should be achieved at the given timestamp.
    Achieved {
        /// Requested achievement timestamp.
        achieved_at: DateTime<Utc>,
    },
}

impl TargetState {
    /// Builds a target from edit-form flags.
    ///
    /// The pin flag is ignored when `achieved` is set.
    #[must_use]
    pub const fn from_flags(pinned: bool, achieved: bool, achieved_at: DateTime<Utc>) -> Self {
        if achieved {
            Self::Achieved { achieved_at }
        } else {
            Self::Active { pinned }
        }
    }

    /// Returns the partition a task in this state belongs to.
    #[must_use]
    pub const fn partition(self) -> Partition {
        match self {
            Self::Active { pinned } => Partition::active(pinned),
            Self::Achieved { .. } => Partition::Achieved,
        }
    }
}

/// Outcome of planning a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// The final placement is known without reading the store.
    Direct {
        /// Partition before the edit.
        from: Partition,
        /// Placement to write.
        status: TaskStatus,
    },
    /// The task enters an active list and needs a new key at `edge`.
    Allocate {
        /// Partition before the edit.
        from: Partition,
        /// Pin flag of the destination list.
        pinned: bool,
        /// Edge of the destination list to insert at.
        edge: OrderEdge,
    },
}

impl TransitionPlan {
    /// Returns the partition before the edit.
    #[must_use]
    pub const fn from(self) -> Partition {
        match self {
            Self::Direct { from, .. } | Self::Allocate { from, .. } => from,
        }
    }

    /// Returns the partition after the edit.
    #[must_use]
    pub const fn to(self) -> Partition {
        match self {
            Self::Direct { status, .. } => status.partition(),
            Self::Allocate { pinned, .. } => Partition::active(pinned),
        }
    }

    /// Returns the new pin flag, `None` when the task ends up achieved.
    #[must_use]
    pub const fn pinned(self) -> Option<bool> {
        match self {
            Self::Direct { status, .. } => status.pinned(),
            Self::Allocate { pinned, .. } => Some(pinned),
        }
    }

    /// Returns the new achievement timestamp.
    #[must_use]
    pub const fn achieved_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Direct { status, .. } => status.achieved_at(),
            Self::Allocate { .. } => None,
        }
    }

    /// Returns the order key when it is known without allocating.
    #[must_use]
    pub const fn order(self) -> Option<OrderKey> {
        match self {
            Self::Direct { status, .. } => status.order(),
            Self::Allocate { .. } => None,
        }
    }

    /// Returns the partition and edge to allocate at, if any.
    #[must_use]
    pub const fn allocation(self) -> Option<(Partition, OrderEdge)> {
        match self {
            Self::Direct { .. } => None,
            Self::Allocate { pinned, edge, .. } => Some((Partition::active(pinned), edge)),
        }
    }
}

/// Edge at which a task entering an active list from elsewhere is placed.
///
/// New pins go to the end of the pinned list; tasks entering the unpinned
/// list go to its front so they are visible straight away.
#[must_use]
pub const fn entry_edge(pinned: bool) -> OrderEdge {
    if pinned { OrderEdge::Max } else { OrderEdge::Min }
}

/// Plans the transition of `current` into `target`.
#[must_use]
pub const fn plan_transition(current: &Task, target: TargetState) -> TransitionPlan {
    let from = current.partition();
    match (current.status(), target) {
        (_, TargetState::Achieved { achieved_at }) => TransitionPlan::Direct {
            from,
            status: TaskStatus::Achieved { achieved_at },
        },
        (TaskStatus::Active { pinned: current_pin, order }, TargetState::Active { pinned })
            if current_pin == pinned =>
        {
            TransitionPlan::Direct {
                from,
                status: TaskStatus::Active { pinned, order },
            }
        }
        (_, TargetState::Active { pinned }) => TransitionPlan::Allocate {
            from,
            pinned,
            edge: entry_edge(pinned),
        },
    }
}
