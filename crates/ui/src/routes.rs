use services::topic_repository::TOPIC_PAGE;
use study_core::model::TopicId;
use url::form_urlencoded;

/// Site pages, as addressed by a relative URL such as `topic.html?id=T01`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Index,
    /// `id` is `None` when the query has no usable `id` parameter.
    Topic { id: Option<TopicId> },
}

impl Route {
    #[must_use]
    pub fn parse(address: &str) -> Self {
        let (path, query) = match address.split_once('?') {
            Some((path, query)) => (path, query),
            None => (address, ""),
        };

        if !path.ends_with(TOPIC_PAGE) {
            return Route::Index;
        }

        let id = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "id")
            .and_then(|(_, value)| TopicId::new(value.into_owned()).ok());
        Route::Topic { id }
    }
}
