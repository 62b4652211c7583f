//! Error types for task domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task content is empty.
    #[error("task content must not be empty")]
    EmptyContent,

    /// The task content exceeds the maximum length.
    #[error("task content is {length} units long, exceeds limit of {max}")]
    ContentTooLong {
        /// Measured content length in UTF-16 code units.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The owner identifier is empty after trimming.
    #[error("owner identifier must not be empty")]
    EmptyOwnerId,

    /// Achieved tasks carry no pin and cannot be pinned or unpinned.
    #[error("task {0} is achieved and cannot be pinned")]
    PinningAchievedTask(TaskId),

    /// The year and month do not name a calendar month.
    #[error("invalid calendar month {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month, 1-based.
        month: u32,
    },
}

/// Error returned while parsing partition names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown partition: {0}")]
pub struct ParsePartitionError(pub String);
