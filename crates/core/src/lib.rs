#![forbid(unsafe_code)]

pub mod model;

pub use model::{Manifest, Topic, TopicDraft, TopicId};
