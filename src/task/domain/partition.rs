//! Derived task partitions.

use super::ParsePartitionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutually exclusive list a task belongs to.
///
/// Partitions are never stored; they are computed from the pin flag and the
/// achievement timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Unachieved and pinned.
    PinnedActive,
    /// Unachieved and not pinned.
    UnpinnedActive,
    /// Achieved; carries no order and no pin.
    Achieved,
}

impl Partition {
    /// All partitions in display order.
    pub const ALL: [Self; 3] = [Self::PinnedActive, Self::UnpinnedActive, Self::Achieved];

    /// Resolves the partition for a pin flag and achievement timestamp.
    ///
    /// An achievement timestamp always wins over the pin flag, and a missing
    /// pin flag on an unachieved task counts as unpinned.
    #[must_use]
    pub const fn resolve(pinned: Option<bool>, achieved_at: Option<DateTime<Utc>>) -> Self {
        match (achieved_at, pinned) {
            (Some(_), _) => Self::Achieved,
            (None, Some(true)) => Self::PinnedActive,
            (None, Some(false) | None) => Self::UnpinnedActive,
        }
    }

    /// Returns the active partition for a pin flag.
    #[must_use]
    pub const fn active(pinned: bool) -> Self {
        if pinned {
            Self::PinnedActive
        } else {
            Self::UnpinnedActive
        }
    }

    /// Returns `true` for the two unachieved partitions, which carry order
    /// keys.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::PinnedActive | Self::UnpinnedActive)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PinnedActive => "pinned_active",
            Self::UnpinnedActive => "unpinned_active",
            Self::Achieved => "achieved",
        }
    }
}

impl TryFrom<&str> for Partition {
    type Error = ParsePartitionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pinned_active" | "pinned" => Ok(Self::PinnedActive),
            "unpinned_active" | "unpinned" => Ok(Self::UnpinnedActive),
            "achieved" => Ok(Self::Achieved),
            _ => Err(ParsePartitionError(value.to_owned())),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
