use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Page areas the controllers render into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    PageTitle,
    TopicTitle,
    TopicMeta,
    TopicsList,
    MobileTopicsList,
    IndexTopicsList,
    TotalTopics,
    CompletedTopics,
    ObjectivesSection,
    ObjectivesList,
    MaterialsContent,
    AudioSection,
    AudioContent,
    ResourcesSection,
    ResourcesList,
    FlashcardsSection,
    FlashcardsContainer,
    CompletionToggle,
    PrevButton,
    NextButton,
}

impl Region {
    /// DOM id of the element backing this region.
    #[must_use]
    pub fn element_id(self) -> &'static str {
        match self {
            Region::PageTitle => "pageTitle",
            Region::TopicTitle => "topicTitle",
            Region::TopicMeta => "topicMeta",
            Region::TopicsList => "topicsList",
            Region::MobileTopicsList => "mobileTopicsList",
            Region::IndexTopicsList => "indexTopicsList",
            Region::TotalTopics => "totalTopics",
            Region::CompletedTopics => "completedTopics",
            Region::ObjectivesSection => "objectivesSection",
            Region::ObjectivesList => "objectivesList",
            Region::MaterialsContent => "materialsContent",
            Region::AudioSection => "audioSection",
            Region::AudioContent => "audioContent",
            Region::ResourcesSection => "resourcesSection",
            Region::ResourcesList => "resourcesList",
            Region::FlashcardsSection => "flashcardsSection",
            Region::FlashcardsContainer => "flashcardsContainer",
            Region::CompletionToggle => "completionToggle",
            Region::PrevButton => "prevButton",
            Region::NextButton => "nextButton",
        }
    }
}

/// Receives rendered markup from the page controllers.
pub trait RenderSink: Send + Sync {
    /// Replace the contents of `region` with `markup`.
    fn render(&self, region: Region, markup: &str);

    /// Show or hide a whole region.
    fn set_hidden(&self, region: Region, hidden: bool);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionState {
    pub markup: Option<String>,
    pub hidden: bool,
    pub renders: usize,
}

/// Sink that keeps the latest markup per region.
#[derive(Clone, Default)]
pub struct RecordingSink {
    regions: Arc<Mutex<BTreeMap<Region, RegionState>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn markup(&self, region: Region) -> Option<String> {
        self.state(region).and_then(|state| state.markup)
    }

    #[must_use]
    pub fn is_hidden(&self, region: Region) -> bool {
        self.state(region).is_some_and(|state| state.hidden)
    }

    /// How many times `region` was rendered.
    #[must_use]
    pub fn render_count(&self, region: Region) -> usize {
        self.state(region).map_or(0, |state| state.renders)
    }

    /// All regions touched so far, in `Region` order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(Region, RegionState)> {
        self.regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(region, state)| (*region, state.clone()))
            .collect()
    }

    fn state(&self, region: Region) -> Option<RegionState> {
        self.regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&region)
            .cloned()
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, region: Region, markup: &str) {
        let mut guard = self.regions.lock().unwrap_or_else(PoisonError::into_inner);
        let state = guard.entry(region).or_default();
        state.markup = Some(markup.to_owned());
        state.renders += 1;
    }

    fn set_hidden(&self, region: Region, hidden: bool) {
        let mut guard = self.regions.lock().unwrap_or_else(PoisonError::into_inner);
        guard.entry(region).or_default().hidden = hidden;
    }
}
