//! Sparse integer ordering keys.
//!
//! Keys within a partition are spaced by a fixed gap so that inserting at
//! either edge never renumbers existing tasks. Ties are possible when two
//! clients allocate against the same extreme concurrently; nothing here
//! detects or repairs them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering key of an active task. Lower keys display first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderKey(i64);

impl OrderKey {
    /// Key handed out when a partition is empty.
    pub const BASELINE: Self = Self(0);

    /// Creates an order key from its raw value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw key value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns the key one gap beyond `self` towards `edge`.
    ///
    /// Returns `None` when the result does not fit in an `i64`.
    #[must_use]
    pub const fn beyond(self, edge: OrderEdge, gap: OrderGap) -> Option<Self> {
        let next = match edge {
            OrderEdge::Max => self.0.checked_add(gap.value()),
            OrderEdge::Min => self.0.checked_sub(gap.value()),
        };
        match next {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edge of a partition at which a task is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEdge {
    /// Before the current smallest key (front of the list).
    Min,
    /// After the current largest key (end of the list).
    Max,
}

impl OrderEdge {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for OrderEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance between keys allocated at the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderGap(i64);

impl OrderGap {
    /// Gap used unless configuration overrides it.
    pub const DEFAULT: Self = Self(100);

    /// Creates a gap, returning `None` unless `value` is positive.
    #[must_use]
    pub const fn new(value: i64) -> Option<Self> {
        if value > 0 { Some(Self(value)) } else { None }
    }

    /// Returns the raw gap value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl Default for OrderGap {
    fn default() -> Self {
        Self::DEFAULT
    }
}
