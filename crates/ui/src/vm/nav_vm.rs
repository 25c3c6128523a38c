use services::TopicRepository;
use study_core::model::TopicId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

/// Previous/next link on a topic page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLinkVm {
    pub direction: NavDirection,
    pub href: String,
    pub label: String,
    pub disabled: bool,
}

/// Build the link to the neighbour of `current`; disabled at the boundaries.
#[must_use]
pub fn build_nav_link(
    repository: &TopicRepository,
    current: &TopicId,
    direction: NavDirection,
) -> NavLinkVm {
    let neighbour = match direction {
        NavDirection::Previous => repository.get_previous(current),
        NavDirection::Next => repository.get_next(current),
    };

    match (neighbour, direction) {
        (Some(topic), NavDirection::Previous) => NavLinkVm {
            direction,
            href: TopicRepository::url_for(topic.id()),
            label: format!("← {}", topic.title()),
            disabled: false,
        },
        (Some(topic), NavDirection::Next) => NavLinkVm {
            direction,
            href: TopicRepository::url_for(topic.id()),
            label: format!("{} →", topic.title()),
            disabled: false,
        },
        (None, NavDirection::Previous) => NavLinkVm {
            direction,
            href: "#".into(),
            label: "← Předchozí".into(),
            disabled: true,
        },
        (None, NavDirection::Next) => NavLinkVm {
            direction,
            href: "#".into(),
            label: "Další →".into(),
            disabled: true,
        },
    }
}
