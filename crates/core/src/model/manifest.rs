use crate::model::ids::{ParseIdError, TopicId};

/// Topic identifiers shipped with the site.
pub const DEFAULT_TOPIC_IDS: &[&str] = &["T01", "T02"];

/// The fixed, known list of topic identifiers the repository attempts to load.
///
/// Entries are unique; the first occurrence of a repeated id wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    ids: Vec<TopicId>,
}

impl Manifest {
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = TopicId>) -> Self {
        let mut unique: Vec<TopicId> = Vec::new();
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self { ids: unique }
    }

    /// Parse a comma-separated list such as `T01,T02, T03`.
    ///
    /// Entries are trimmed and blank entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the list contains no usable id.
    pub fn parse_list(raw: &str) -> Result<Self, ParseIdError> {
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(TopicId::new)
            .collect::<Result<Vec<_>, _>>()?;
        if ids.is_empty() {
            return Err(ParseIdError::new("Manifest"));
        }
        Ok(Self::new(ids))
    }

    #[must_use]
    pub fn ids(&self) -> &[TopicId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(
            DEFAULT_TOPIC_IDS
                .iter()
                .filter_map(|raw| TopicId::new(*raw).ok()),
        )
    }
}
