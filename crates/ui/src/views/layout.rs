use crate::sink::{RecordingSink, Region};

/// Assemble a standalone HTML document from everything rendered into `sink`.
/// `PageTitle` becomes the document title; `fallback_title` is used when no
/// page title was rendered.
#[must_use]
pub fn render_document(sink: &RecordingSink, fallback_title: &str) -> String {
    let snapshot = sink.snapshot();
    let title = snapshot
        .iter()
        .find(|(region, _)| *region == Region::PageTitle)
        .and_then(|(_, state)| state.markup.clone())
        .unwrap_or_else(|| crate::markup::escape_html(fallback_title));

    let mut body = String::new();
    for (region, state) in &snapshot {
        if *region == Region::PageTitle {
            continue;
        }
        let hidden = if state.hidden { " hidden" } else { "" };
        body.push_str(&format!(
            "<div id=\"{}\"{hidden}>{}</div>\n",
            region.element_id(),
            state.markup.as_deref().unwrap_or_default()
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"cs\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}
