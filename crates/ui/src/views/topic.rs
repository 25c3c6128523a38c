use std::sync::Arc;

use services::{CompletionStore, SubscriptionId, TopicRepository};
use study_core::model::{Audio, Materials, Resource, Topic, TopicId};
use tracing::{error, info, warn};

use super::flashcards::FlashcardWidget;
use super::state::ViewError;
use super::topic_list::render_topic_lists;
use crate::context::AppContext;
use crate::markup::{escape_html, markdown_to_html};
use crate::routes::Route;
use crate::sink::{Region, RenderSink};
use crate::vm::{NavDirection, NavLinkVm, build_nav_link};

const SIDEBAR_REGIONS: [Region; 2] = [Region::TopicsList, Region::MobileTopicsList];

/// Detail page for one topic.
pub struct TopicPage {
    ctx: AppContext,
    sink: Arc<dyn RenderSink>,
    repository: TopicRepository,
    topic_id: Option<TopicId>,
    topic: Option<Topic>,
    flashcards: FlashcardWidget,
    subscription: Option<SubscriptionId>,
}

impl TopicPage {
    #[must_use]
    pub fn new(ctx: AppContext, sink: Arc<dyn RenderSink>) -> Self {
        let repository = ctx.new_repository();
        let flashcards = FlashcardWidget::new(Arc::clone(&sink));
        Self {
            ctx,
            sink,
            repository,
            topic_id: None,
            topic: None,
            flashcards,
            subscription: None,
        }
    }

    /// Initialize from a page address such as `topic.html?id=T01`.
    pub async fn init_from_address(&mut self, address: &str) -> Result<(), ViewError> {
        match Route::parse(address) {
            Route::Topic { id } => self.init(id).await,
            Route::Index => self.init(None).await,
        }
    }

    pub async fn init(&mut self, id: Option<TopicId>) -> Result<(), ViewError> {
        let Some(id) = id else {
            return Err(self.fail(ViewError::MissingTopicId));
        };
        info!(topic = %id, "initializing topic page");

        self.repository.load_all().await;

        let topic = match self.repository.load_one(&id).await {
            Ok(topic) => topic,
            Err(err) if err.status().map(|status| status.as_u16()) == Some(404) => {
                return Err(self.fail(ViewError::TopicNotFound(id)));
            }
            Err(err) => return Err(self.fail(ViewError::Load(err.to_string()))),
        };

        let store = self.ctx.completion_store();
        render_sidebar(self.sink.as_ref(), &store, self.repository.topics(), &id);
        self.render_content(&topic);

        if topic.has_flashcards() {
            self.sink.set_hidden(Region::FlashcardsSection, false);
            self.flashcards.start(topic.flashcards());
        } else {
            self.sink.set_hidden(Region::FlashcardsSection, true);
        }

        render_completion_toggle(self.sink.as_ref(), store.is_completed(&id));
        self.render_navigation(&id);
        self.subscribe(&store, id.clone());
        self.topic_id = Some(id);
        self.topic = Some(topic);
        Ok(())
    }

    #[must_use]
    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    /// Id the page was opened with. Completion is keyed by it, even when the
    /// document carries a different `id`.
    #[must_use]
    pub fn topic_id(&self) -> Option<&TopicId> {
        self.topic_id.as_ref()
    }

    #[must_use]
    pub fn flashcards(&self) -> &FlashcardWidget {
        &self.flashcards
    }

    pub fn flashcards_mut(&mut self) -> &mut FlashcardWidget {
        &mut self.flashcards
    }

    /// Flip the completion flag of the shown topic. Returns the new value, or
    /// `None` when no topic is loaded.
    pub fn toggle_completion(&self) -> Option<bool> {
        let id = self.topic_id.as_ref()?;
        let store = self.ctx.completion_store();
        let completed = !store.is_completed(id);
        self.set_completed(completed);
        Some(completed)
    }

    /// Sidebar and toggle re-render through the progress subscription.
    pub fn set_completed(&self, completed: bool) {
        if let Some(id) = self.topic_id.as_ref() {
            self.ctx.completion_store().set_completed(id, completed);
        }
    }

    fn fail(&self, err: ViewError) -> ViewError {
        match &err {
            ViewError::Load(_) => error!(%err, "topic page failed to load"),
            _ => warn!(%err, "topic page cannot be shown"),
        }
        self.sink
            .render(Region::TopicTitle, &escape_html(&err.message()));
        err
    }

    fn subscribe(&mut self, store: &Arc<CompletionStore>, id: TopicId) {
        if let Some(previous) = self.subscription.take() {
            store.unsubscribe(previous);
        }
        let sink = Arc::clone(&self.sink);
        let weak_store = Arc::downgrade(store);
        let topics = Arc::new(self.repository.topics().to_vec());
        self.subscription = Some(store.subscribe(move |_| {
            if let Some(store) = weak_store.upgrade() {
                render_sidebar(sink.as_ref(), &store, &topics, &id);
                render_completion_toggle(sink.as_ref(), store.is_completed(&id));
            }
        }));
    }

    fn render_content(&self, topic: &Topic) {
        let sink = self.sink.as_ref();
        sink.render(
            Region::PageTitle,
            &escape_html(&format!("{} - {}", topic.title(), self.ctx.site_title())),
        );
        sink.render(Region::TopicTitle, &escape_html(topic.title()));
        sink.render(Region::TopicMeta, "");

        if topic.objectives().is_empty() {
            sink.set_hidden(Region::ObjectivesSection, true);
        } else {
            sink.set_hidden(Region::ObjectivesSection, false);
            let items: String = topic
                .objectives()
                .iter()
                .map(|objective| {
                    format!(r#"<li class="objective-item">{}</li>"#, escape_html(objective))
                })
                .collect();
            sink.render(Region::ObjectivesList, &items);
        }

        if let Some(materials) = topic.materials() {
            sink.render(Region::MaterialsContent, &materials_markup(materials));
        }

        match topic.audio() {
            Some(audio) => {
                sink.set_hidden(Region::AudioSection, false);
                sink.render(Region::AudioContent, &audio_markup(audio));
            }
            None => sink.set_hidden(Region::AudioSection, true),
        }

        if topic.resources().is_empty() {
            sink.set_hidden(Region::ResourcesSection, true);
        } else {
            sink.set_hidden(Region::ResourcesSection, false);
            let items: String = topic.resources().iter().map(resource_markup).collect();
            sink.render(Region::ResourcesList, &items);
        }
    }

    fn render_navigation(&self, id: &TopicId) {
        let previous = build_nav_link(&self.repository, id, NavDirection::Previous);
        let next = build_nav_link(&self.repository, id, NavDirection::Next);
        self.sink.render(Region::PrevButton, &nav_markup(&previous));
        self.sink.render(Region::NextButton, &nav_markup(&next));
    }
}

impl Drop for TopicPage {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.ctx.completion_store().unsubscribe(id);
        }
    }
}

fn render_sidebar(sink: &dyn RenderSink, store: &CompletionStore, topics: &[Topic], id: &TopicId) {
    render_topic_lists(sink, &SIDEBAR_REGIONS, topics, store, Some(id));
}

fn render_completion_toggle(sink: &dyn RenderSink, completed: bool) {
    let (class, checked, label) = if completed {
        (" completed", " checked", "Dokončeno")
    } else {
        ("", "", "Označit jako dokončené")
    };
    sink.render(
        Region::CompletionToggle,
        &format!(
            r#"<label class="completion-toggle{class}"><input type="checkbox" id="completionCheckbox"{checked}><span id="completionLabel">{label}</span></label>"#
        ),
    );
}

fn materials_markup(materials: &Materials) -> String {
    let mut html = String::new();
    if let Some(summary) = materials.summary.as_deref() {
        html.push_str(&format!(
            r#"<div class="materials-summary"><p>{}</p></div>"#,
            markdown_to_html(summary)
        ));
    }
    for section in &materials.sections {
        html.push_str(r#"<div class="materials-section">"#);
        if let Some(heading) = section.heading.as_deref() {
            html.push_str(&format!(
                r#"<h3 class="materials-heading">{}</h3>"#,
                escape_html(heading)
            ));
        }
        html.push_str(&format!(
            r#"<div class="materials-content"><p>{}</p></div></div>"#,
            markdown_to_html(&section.content)
        ));
    }
    html
}

fn audio_markup(audio: &Audio) -> String {
    let title = audio.title.as_deref().unwrap_or("Audio");
    let mut html = format!(
        concat!(
            r#"<h3 class="audio-title">{title}</h3>"#,
            r#"<audio class="audio-player" controls><source src="{src}" type="audio/mpeg">"#,
            r#"Váš prohlížeč nepodporuje audio element.</audio>"#
        ),
        title = escape_html(title),
        src = escape_html(&audio.src),
    );
    if let Some(transcript) = audio.transcript_text() {
        html.push_str(&format!(
            concat!(
                r#"<div class="audio-transcript">"#,
                r#"<button class="audio-transcript-toggle" id="transcriptToggle">Zobrazit přepis</button>"#,
                r#"<div class="audio-transcript-content" id="transcriptContent" hidden><p>{}</p></div>"#,
                r#"</div>"#
            ),
            markdown_to_html(transcript)
        ));
    }
    html
}

fn resource_markup(resource: &Resource) -> String {
    let reason = resource
        .reason
        .as_deref()
        .map(|reason| {
            format!(
                r#"<div class="resource-reason">{}</div>"#,
                escape_html(reason)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<li class="resource-item"><a href="{url}" target="_blank" rel="noopener noreferrer" class="resource-title">{title}</a>{reason}</li>"#,
        url = escape_html(&resource.url),
        title = escape_html(&resource.title),
    )
}

fn nav_markup(link: &NavLinkVm) -> String {
    let (class, aria) = if link.disabled {
        (" disabled", r#" aria-disabled="true""#)
    } else {
        ("", "")
    };
    format!(
        r#"<a href="{href}" class="nav-button{class}"{aria}>{label}</a>"#,
        href = escape_html(&link.href),
        label = escape_html(&link.label),
    )
}
