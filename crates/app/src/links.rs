use std::fs;
use std::path::{Component, Path, PathBuf};

use services::{DeadLink, LinkChecker, TopicRepository, find_dead_links, prune_dead_links};
use tracing::{info, warn};
use ui::AppContext;

#[derive(Debug, Default)]
pub struct LinkReport {
    pub checked_topics: usize,
    pub dead: Vec<DeadLink>,
    /// Topic documents rewritten without their dead resources.
    pub pruned: Vec<PathBuf>,
}

/// Check every resource URL of the loaded topics. With `prune_root`, dead
/// resources are also removed from the topic documents under that site
/// directory.
pub async fn check_links(
    ctx: &AppContext,
    checker: &dyn LinkChecker,
    prune_root: Option<&Path>,
) -> Result<LinkReport, Box<dyn std::error::Error>> {
    let mut repository = ctx.new_repository();
    repository.load_all().await;

    let dead = find_dead_links(repository.topics(), checker).await;
    let pruned = match prune_root {
        Some(root) if !dead.is_empty() => prune_documents(&repository, root, &dead).await?,
        _ => Vec::new(),
    };

    Ok(LinkReport {
        checked_topics: repository.topics().len(),
        dead,
        pruned,
    })
}

/// Documents live under the manifest id they were fetched by, which may
/// differ from the `id` they carry.
async fn prune_documents(
    repository: &TopicRepository,
    root: &Path,
    dead: &[DeadLink],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut written = Vec::new();

    for id in repository.manifest().ids() {
        let Ok(topic) = repository.load_one(id).await else {
            continue;
        };
        if !dead.iter().any(|link| &link.topic_id == topic.id()) {
            continue;
        }

        let relative = PathBuf::from(TopicRepository::document_path(id));
        if !relative
            .components()
            .all(|part| matches!(part, Component::Normal(_)))
        {
            warn!(topic = %id, "not pruning a document outside the site directory");
            continue;
        }

        let before = topic.resources().len();
        let pruned = prune_dead_links(topic, dead)?;
        let path = root.join(relative);
        fs::write(&path, serde_json::to_string_pretty(&pruned)? + "\n")?;
        info!(
            topic = %id,
            removed = before - pruned.resources().len(),
            path = %path.display(),
            "pruned dead resources"
        );
        written.push(path);
    }

    Ok(written)
}
