use study_core::model::TopicId;
use thiserror::Error;

/// User-visible failure of a page controller. The message is what the page
/// shows inline.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViewError {
    #[error("Chyba: Nebylo zadáno ID otázky")]
    MissingTopicId,
    #[error("Chyba: Otázka {0} nenalezena")]
    TopicNotFound(TopicId),
    #[error("Chyba při načítání otázky: {0}")]
    Load(String),
    #[error("Chyba při načítání otázek. Zkontrolujte, zda existují soubory v data/topics/")]
    NoTopics,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}
