//! Validated task content.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text of a task.
///
/// Length is measured in UTF-16 code units so that the bound matches what
/// browser clients count when they enforce the same limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskContent(String);

impl TaskContent {
    /// Maximum accepted content length in UTF-16 code units.
    pub const MAX_LENGTH: usize = 100;

    /// Creates validated task content.
    ///
    /// Content is stored verbatim; surrounding whitespace is not trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyContent`] for an empty string and
    /// [`TaskDomainError::ContentTooLong`] when the value exceeds
    /// [`Self::MAX_LENGTH`] units.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let length = raw.encode_utf16().count();
        if length == 0 {
            return Err(TaskDomainError::EmptyContent);
        }
        if length > Self::MAX_LENGTH {
            return Err(TaskDomainError::ContentTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(raw))
    }

    /// Wraps content read back from storage without validation.
    ///
    /// Legacy records may hold empty content; they are still displayable.
    #[must_use]
    pub(crate) const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the content as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the content length in UTF-16 code units.
    #[must_use]
    pub fn len_units(&self) -> usize {
        self.0.encode_utf16().count()
    }
}

impl TryFrom<String> for TaskContent {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskContent> for String {
    fn from(content: TaskContent) -> Self {
        content.0
    }
}

impl AsRef<str> for TaskContent {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
