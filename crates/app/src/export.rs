use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use services::TopicRepository;
use study_core::model::TopicId;
use tracing::{info, warn};
use ui::markup::escape_html;
use ui::{AppContext, IndexPage, RecordingSink, TopicPage, render_document};

/// Render the index and every loadable topic into `out` as static pages.
/// Returns the written paths.
pub async fn export_site(
    ctx: &AppContext,
    out: &Path,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    fs::create_dir_all(out)?;

    let sink = RecordingSink::new();
    let mut index = IndexPage::new(ctx.clone(), Arc::new(sink.clone()));
    index.init().await?;
    let ids: Vec<TopicId> = index.topics().iter().map(|topic| topic.id().clone()).collect();
    drop(index);
    let pages = assign_file_names(&ids);

    let mut written = Vec::with_capacity(pages.len() + 1);
    let index_path = out.join("index.html");
    fs::write(
        &index_path,
        link_local(&render_document(&sink, ctx.site_title()), &pages),
    )?;
    written.push(index_path);

    for (id, name) in &pages {
        let sink = RecordingSink::new();
        let mut page = TopicPage::new(ctx.clone(), Arc::new(sink.clone()));
        if let Err(err) = page.init(Some(id.clone())).await {
            warn!(topic = %id, %err, "skipping topic in export");
            continue;
        }
        let path = out.join(name);
        fs::write(&path, link_local(&render_document(&sink, ctx.site_title()), &pages))?;
        written.push(path);
    }

    info!(pages = written.len(), out = %out.display(), "site exported");
    Ok(written)
}

/// `topic-<id>.html`, with anything unsafe in a file name replaced by `_`.
pub fn file_name(id: &TopicId) -> String {
    let safe: String = id
        .as_str()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("topic-{safe}.html")
}

/// Pair every id with a distinct file name. Ids that flatten to a name
/// already taken get a `-2`, `-3`, ... suffix.
pub fn assign_file_names(ids: &[TopicId]) -> Vec<(TopicId, String)> {
    let mut taken = HashSet::new();
    ids.iter()
        .map(|id| {
            let base = file_name(id);
            let mut name = base.clone();
            let mut n = 2;
            while !taken.insert(name.clone()) {
                let stem = base.trim_end_matches(".html");
                name = format!("{stem}-{n}.html");
                n += 1;
            }
            if name != base {
                warn!(topic = %id, file = %name, "file name collision; using a suffixed name");
            }
            (id.clone(), name)
        })
        .collect()
}

fn link_local(html: &str, pages: &[(TopicId, String)]) -> String {
    pages.iter().fold(html.to_owned(), |html, (id, name)| {
        let dynamic = format!("href=\"{}\"", escape_html(&TopicRepository::url_for(id)));
        let local = format!("href=\"{name}\"");
        html.replace(&dynamic, &local)
    })
}
