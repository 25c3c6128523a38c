mod flashcard_vm;
mod nav_vm;
mod topic_list_vm;

pub use flashcard_vm::{FlashcardVm, map_flashcard};
pub use nav_vm::{NavDirection, NavLinkVm, build_nav_link};
pub use topic_list_vm::{IndexStatsVm, TopicListItemVm, build_index_stats, map_topic_list};
