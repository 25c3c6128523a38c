mod flashcards;
mod index;
mod layout;
mod state;
mod topic;
mod topic_list;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use flashcards::{FlashcardKey, FlashcardWidget};
pub use index::IndexPage;
pub use layout::render_document;
pub use state::ViewError;
pub use topic::TopicPage;
