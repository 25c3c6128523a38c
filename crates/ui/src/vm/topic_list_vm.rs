use services::{CompletionStore, TopicRepository};
use study_core::model::{Topic, TopicId};

/// UI-ready row of a topic list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicListItemVm {
    pub id: TopicId,
    pub title: String,
    pub href: String,
    pub completed: bool,
    pub active: bool,
}

/// Map loaded topics into list rows, marking completion and the active topic.
#[must_use]
pub fn map_topic_list(
    topics: &[Topic],
    store: &CompletionStore,
    active: Option<&TopicId>,
) -> Vec<TopicListItemVm> {
    topics
        .iter()
        .map(|topic| TopicListItemVm {
            id: topic.id().clone(),
            title: topic.title().to_owned(),
            href: TopicRepository::url_for(topic.id()),
            completed: store.is_completed(topic.id()),
            active: active == Some(topic.id()),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexStatsVm {
    pub total: usize,
    pub completed: usize,
}

/// `completed` counts every stored flag, including ids outside `topics`.
#[must_use]
pub fn build_index_stats(topics: &[Topic], store: &CompletionStore) -> IndexStatsVm {
    IndexStatsVm {
        total: topics.len(),
        completed: store.count_completed(),
    }
}
