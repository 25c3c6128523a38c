mod ids;
mod manifest;
mod topic;

pub use ids::{ParseIdError, TopicId};
pub use manifest::{DEFAULT_TOPIC_IDS, Manifest};
pub use topic::{
    Audio, Flashcard, Materials, MaterialsSection, Resource, Topic, TopicDraft, TopicError,
};
