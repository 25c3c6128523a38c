use services::CompletionStore;
use study_core::model::{Topic, TopicId};

use crate::markup::escape_html;
use crate::sink::{Region, RenderSink};
use crate::vm::{TopicListItemVm, map_topic_list};

pub(crate) fn render_topic_lists(
    sink: &dyn RenderSink,
    regions: &[Region],
    topics: &[Topic],
    store: &CompletionStore,
    active: Option<&TopicId>,
) {
    let markup = topic_list_markup(&map_topic_list(topics, store, active));
    for region in regions {
        sink.render(*region, &markup);
    }
}

pub(crate) fn message_item(message: &str) -> String {
    format!(
        r#"<li class="topic-item"><div class="topic-link">{}</div></li>"#,
        escape_html(message)
    )
}

fn topic_list_markup(items: &[TopicListItemVm]) -> String {
    if items.is_empty() {
        return message_item("Žádné otázky nejsou k dispozici");
    }

    items
        .iter()
        .map(|item| {
            let active_class = if item.active { " active" } else { "" };
            let aria_current = if item.active {
                r#" aria-current="page""#
            } else {
                ""
            };
            let (check_class, check_label) = if item.completed {
                (" completed", "Dokončeno")
            } else {
                ("", "Nedokončeno")
            };
            format!(
                concat!(
                    r#"<li class="topic-item">"#,
                    r#"<a href="{href}" class="topic-link{active_class}"{aria_current}>"#,
                    r#"<div class="topic-info"><div class="topic-title">{title}</div></div>"#,
                    r#"<div class="topic-status">"#,
                    r#"<div class="completion-check{check_class}" aria-label="{check_label}"></div>"#,
                    r#"</div></a></li>"#
                ),
                href = escape_html(&item.href),
                active_class = active_class,
                aria_current = aria_current,
                title = escape_html(&item.title),
                check_class = check_class,
                check_label = check_label,
            )
        })
        .collect()
}
