#![forbid(unsafe_code)]

pub mod completion_store;
pub mod error;
pub mod flashcard_session;
pub mod link_check;
pub mod topic_repository;
pub mod topic_source;

pub use completion_store::{CompletionStore, ProgressUpdated, SubscriptionId};
pub use error::{LoadError, SourceError};
pub use flashcard_session::{FlashcardSession, SessionPosition};
pub use link_check::{
    DeadLink, HttpLinkChecker, LinkChecker, LinkStatus, find_dead_links, prune_dead_links,
};
pub use topic_repository::TopicRepository;
pub use topic_source::{
    FsTopicSource, HttpTopicSource, InMemoryTopicSource, SiteRoot, TopicSource,
};
