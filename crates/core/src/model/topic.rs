use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::model::ids::TopicId;

//
// ─── TOPIC PARTS ───────────────────────────────────────────────────────────────
//

/// A question/answer pair used for recall practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(rename = "q")]
    pub question: String,
    #[serde(rename = "a")]
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Study text for a topic: a summary followed by titled sections.
///
/// Bodies are markdown-flavored (bold, italic and line breaks only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Materials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub sections: Vec<MaterialsSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl Audio {
    /// Transcript text, if present and not blank.
    #[must_use]
    pub fn transcript_text(&self) -> Option<&str> {
        self.transcript
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// External reading or listening suggested for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

//
// ─── TOPIC DRAFT ───────────────────────────────────────────────────────────────
//

/// Raw shape of a topic document, before validation.
///
/// Every field is optional here so that a document missing `id` or `title`
/// surfaces as a `TopicError` instead of a JSON error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDraft {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Materials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<Resource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flashcards: Vec<Flashcard>,
}

/// `null` reads the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TopicDraft {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validate the draft into an immutable `Topic`.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::MissingId` or `TopicError::MissingTitle` when the
    /// corresponding field is absent or blank.
    pub fn validate(self) -> Result<Topic, TopicError> {
        let id = TopicId::new(self.id).map_err(|_| TopicError::MissingId)?;
        if self.title.trim().is_empty() {
            return Err(TopicError::MissingTitle { id });
        }

        Ok(Topic {
            id,
            title: self.title,
            order: self.order.unwrap_or(0),
            objectives: self.objectives,
            materials: self.materials,
            audio: self.audio,
            resources: self.resources,
            flashcards: self.flashcards,
        })
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// One exam question / study unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopicDraft", into = "TopicDraft")]
pub struct Topic {
    id: TopicId,
    title: String,
    order: i64,
    objectives: Vec<String>,
    materials: Option<Materials>,
    audio: Option<Audio>,
    resources: Vec<Resource>,
    flashcards: Vec<Flashcard>,
}

impl Topic {
    #[must_use]
    pub fn id(&self) -> &TopicId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sequencing key; documents without one sort as `0`.
    #[must_use]
    pub fn order(&self) -> i64 {
        self.order
    }

    #[must_use]
    pub fn objectives(&self) -> &[String] {
        &self.objectives
    }

    #[must_use]
    pub fn materials(&self) -> Option<&Materials> {
        self.materials.as_ref()
    }

    #[must_use]
    pub fn audio(&self) -> Option<&Audio> {
        self.audio.as_ref()
    }

    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    #[must_use]
    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    #[must_use]
    pub fn has_flashcards(&self) -> bool {
        !self.flashcards.is_empty()
    }
}

impl TryFrom<TopicDraft> for Topic {
    type Error = TopicError;

    fn try_from(draft: TopicDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<Topic> for TopicDraft {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id.as_str().to_owned(),
            title: topic.title,
            order: Some(topic.order),
            objectives: topic.objectives,
            materials: topic.materials,
            audio: topic.audio,
            resources: topic.resources,
            flashcards: topic.flashcards,
        }
    }
}

//
// ─── TOPIC VALIDATION ERRORS ───────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic document is missing an id")]
    MissingId,

    #[error("topic {id} is missing a title")]
    MissingTitle { id: TopicId },
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOCUMENT: &str = r#"{
        "id": "T01",
        "title": "Romantický balet",
        "order": 3,
        "objectives": ["Vysvětlit pojem", "Uvést příklady"],
        "materials": {
            "summary": "**Romantismus** v baletu",
            "sections": [
                {"heading": "Počátky", "content": "Paříž, 1832"},
                {"content": "Bez nadpisu"}
            ]
        },
        "audio": {"title": "Poslech", "src": "audio/t01.mp3", "transcript": "Text"},
        "resources": [
            {"title": "Wiki", "url": "https://cs.wikipedia.org/wiki/Balet", "reason": "Přehled"},
            {"title": "Bez důvodu", "url": "https://example.org"}
        ],
        "flashcards": [{"q": "Kdy?", "a": "1832"}, {"q": "Kdo?", "a": "Taglioni"}]
    }"#;

    #[test]
    fn parses_full_document() {
        let topic: Topic = serde_json::from_str(FULL_DOCUMENT).unwrap();
        assert_eq!(topic.id().as_str(), "T01");
        assert_eq!(topic.order(), 3);
        assert_eq!(topic.objectives().len(), 2);
        let materials = topic.materials().unwrap();
        assert_eq!(materials.sections.len(), 2);
        assert_eq!(materials.sections[1].heading, None);
        assert_eq!(topic.resources()[1].reason, None);
        assert_eq!(topic.flashcards()[1], Flashcard::new("Kdo?", "Taglioni"));
    }

    #[test]
    fn missing_order_defaults_to_zero() {
        let topic: Topic = serde_json::from_str(r#"{"id": "T02", "title": "Baroko"}"#).unwrap();
        assert_eq!(topic.order(), 0);
        assert!(topic.materials().is_none());
        assert!(topic.audio().is_none());
        assert!(!topic.has_flashcards());
    }

    #[test]
    fn missing_id_is_a_validation_error() {
        let draft: TopicDraft = serde_json::from_str(r#"{"title": "Bez id"}"#).unwrap();
        assert_eq!(draft.validate().unwrap_err(), TopicError::MissingId);
    }

    #[test]
    fn null_lists_read_as_empty() {
        for field in ["objectives", "resources", "flashcards"] {
            let json = format!(r#"{{"id": "T01", "title": "Baroko", "{field}": null}}"#);
            let topic: Topic = serde_json::from_str(&json).unwrap();
            assert!(topic.objectives().is_empty(), "{field}");
            assert!(topic.resources().is_empty(), "{field}");
            assert!(!topic.has_flashcards(), "{field}");
        }
    }

    #[test]
    fn null_id_or_title_is_a_validation_error() {
        let draft: TopicDraft = serde_json::from_str(r#"{"id": null, "title": "Baroko"}"#).unwrap();
        assert_eq!(draft.validate().unwrap_err(), TopicError::MissingId);

        let draft: TopicDraft = serde_json::from_str(r#"{"id": "T01", "title": null}"#).unwrap();
        assert!(matches!(
            draft.validate().unwrap_err(),
            TopicError::MissingTitle { .. }
        ));
    }

    #[test]
    fn document_id_is_kept_verbatim() {
        let topic: Topic = serde_json::from_str(r#"{"id": " T01 ", "title": "Baroko"}"#).unwrap();
        assert_eq!(topic.id().as_str(), " T01 ");
    }

    #[test]
    fn blank_title_is_a_validation_error() {
        let err = TopicDraft::new("T03", "  ").validate().unwrap_err();
        assert!(matches!(err, TopicError::MissingTitle { .. }));
    }

    #[test]
    fn serialize_then_parse_is_lossless() {
        let topic: Topic = serde_json::from_str(FULL_DOCUMENT).unwrap();
        let json = serde_json::to_string(&topic).unwrap();
        let reparsed: Topic = serde_json::from_str(&json).unwrap();
        assert_eq!(topic, reparsed);
    }

    #[test]
    fn blank_transcript_is_treated_as_absent() {
        let audio = Audio {
            title: None,
            src: "a.mp3".into(),
            transcript: Some("   ".into()),
        };
        assert_eq!(audio.transcript_text(), None);
    }
}
