use std::sync::Arc;

use services::{CompletionStore, SubscriptionId, TopicRepository};
use study_core::model::Topic;
use tracing::{error, info};

use super::state::ViewError;
use super::topic_list::{message_item, render_topic_lists};
use crate::context::AppContext;
use crate::sink::{Region, RenderSink};
use crate::vm::build_index_stats;

const LIST_REGIONS: [Region; 3] = [
    Region::TopicsList,
    Region::MobileTopicsList,
    Region::IndexTopicsList,
];

/// Landing page: every topic list plus the completion counters. Re-renders
/// itself whenever progress changes while it is alive.
pub struct IndexPage {
    ctx: AppContext,
    sink: Arc<dyn RenderSink>,
    repository: TopicRepository,
    subscription: Option<SubscriptionId>,
}

impl IndexPage {
    #[must_use]
    pub fn new(ctx: AppContext, sink: Arc<dyn RenderSink>) -> Self {
        let repository = ctx.new_repository();
        Self {
            ctx,
            sink,
            repository,
            subscription: None,
        }
    }

    pub async fn init(&mut self) -> Result<(), ViewError> {
        info!("initializing index page");
        let topics = self.repository.load_all().await.to_vec();

        if topics.is_empty() {
            let err = ViewError::NoTopics;
            error!(%err, "index page has nothing to show");
            let markup = message_item(&err.message());
            for region in LIST_REGIONS {
                self.sink.render(region, &markup);
            }
            return Err(err);
        }

        let store = self.ctx.completion_store();
        render_index(self.sink.as_ref(), &store, &topics);

        if let Some(previous) = self.subscription.take() {
            store.unsubscribe(previous);
        }
        let sink = Arc::clone(&self.sink);
        let weak_store = Arc::downgrade(&store);
        let topics = Arc::new(topics);
        self.subscription = Some(store.subscribe(move |_| {
            if let Some(store) = weak_store.upgrade() {
                render_index(sink.as_ref(), &store, &topics);
            }
        }));
        Ok(())
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        self.repository.topics()
    }

    pub fn refresh(&self) {
        render_index(
            self.sink.as_ref(),
            &self.ctx.completion_store(),
            self.repository.topics(),
        );
    }
}

impl Drop for IndexPage {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.ctx.completion_store().unsubscribe(id);
        }
    }
}

fn render_index(sink: &dyn RenderSink, store: &CompletionStore, topics: &[Topic]) {
    render_topic_lists(sink, &LIST_REGIONS, topics, store, None);
    let stats = build_index_stats(topics, store);
    sink.render(Region::TotalTopics, &stats.total.to_string());
    sink.render(Region::CompletedTopics, &stats.completed.to_string());
}
