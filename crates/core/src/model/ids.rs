use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Topic (e.g. `T01`).
///
/// Used as the storage key for completion flags and as the routing key for
/// topic detail pages.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    /// Creates a new `TopicId`. The value is kept as given; callers that
    /// accept user input trim it first.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the value is empty or whitespace only.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        let raw = id.into();
        if raw.trim().is_empty() {
            return Err(ParseIdError::new("TopicId"));
        }
        Ok(Self(raw))
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicId({})", self.0)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TopicId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl ParseIdError {
    pub(crate) fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for TopicId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TopicId::new(s)
    }
}
