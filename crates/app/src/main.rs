mod config;
mod export;
mod links;
mod review;

use std::sync::Arc;

use services::{CompletionStore, HttpLinkChecker, SiteRoot, TopicSource};
use storage::{LocalProgress, Storage};
use study_core::model::Manifest;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use ui::{AppContext, IndexPage, RecordingSink, TopicPage, UiApp, build_app_context};

use config::{Args, Command, Config};

struct CliApp {
    source: Arc<dyn TopicSource>,
    manifest: Manifest,
    completion_store: Arc<CompletionStore>,
}

impl UiApp for CliApp {
    fn topic_source(&self) -> Arc<dyn TopicSource> {
        Arc::clone(&self.source)
    }

    fn manifest(&self) -> Manifest {
        self.manifest.clone()
    }

    fn completion_store(&self) -> Arc<CompletionStore> {
        Arc::clone(&self.completion_store)
    }
}

pub(crate) fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  study index    [common]");
    eprintln!("  study topic    [common] --id <id>");
    eprintln!("  study complete [common] --id <id> [--undo]");
    eprintln!("  study review   [common] --id <id>");
    eprintln!("  study export   [common] --out <dir>");
    eprintln!("  study check-links [common] [--prune]");
    eprintln!();
    eprintln!("Common options:");
    eprintln!("  --site <url-or-dir>   site root holding data/topics/ (default .)");
    eprintln!("  --topics <T01,T02>    topic ids to load");
    eprintln!("  --db <path>           progress database (default progress.sqlite3, or :memory:)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_SITE, STUDY_TOPICS, STUDY_PROGRESS_DB, RUST_LOG");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn build_context(config: &Config) -> Result<AppContext, Box<dyn std::error::Error>> {
    let storage = Storage::sqlite(&config.db)?;
    let backend = Arc::new(LocalProgress::new(Arc::clone(&storage.kv)));
    let app: Arc<dyn UiApp> = Arc::new(CliApp {
        source: SiteRoot::parse(&config.site).into_source(),
        manifest: config.manifest.clone(),
        completion_store: Arc::new(CompletionStore::new(backend)),
    });
    info!(site = %config.site, db = %config.db, topics = config.manifest.len(), "configured");
    Ok(build_app_context(&app))
}

async fn show_index(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = IndexPage::new(ctx.clone(), Arc::new(RecordingSink::new()));
    page.init().await?;

    let store = ctx.completion_store();
    for topic in page.topics() {
        let mark = if store.is_completed(topic.id()) { "x" } else { " " };
        println!("[{mark}] {:<6} {}", topic.id(), topic.title());
    }
    println!();
    println!(
        "Dokončeno {} z {}",
        store.count_completed(),
        page.topics().len()
    );
    Ok(())
}

async fn show_topic(ctx: &AppContext, args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = TopicPage::new(ctx.clone(), Arc::new(RecordingSink::new()));
    page.init(args.id).await?;
    let Some(topic) = page.topic() else {
        return Ok(());
    };

    println!("{}", topic.title());
    for objective in topic.objectives() {
        println!("  - {objective}");
    }
    if let Some(summary) = topic.materials().and_then(|m| m.summary.as_deref()) {
        println!();
        println!("{summary}");
    }
    for resource in topic.resources() {
        println!("  * {} <{}>", resource.title, resource.url);
    }
    let completed = page
        .topic_id()
        .is_some_and(|id| ctx.completion_store().is_completed(id));
    let status = if completed {
        "Dokončeno"
    } else {
        "Nedokončeno"
    };
    println!();
    println!("{status}, kartiček: {}", topic.flashcards().len());
    Ok(())
}

async fn complete(ctx: &AppContext, args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = TopicPage::new(ctx.clone(), Arc::new(RecordingSink::new()));
    page.init(args.id).await?;
    page.set_completed(!args.undo);
    if let Some(id) = page.topic_id() {
        let state = if args.undo { "nedokončeno" } else { "dokončeno" };
        println!("{id}: {state}");
    }
    Ok(())
}

async fn start_review(ctx: &AppContext, args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = TopicPage::new(ctx.clone(), Arc::new(RecordingSink::new()));
    page.init(args.id).await?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    review::run_review(page.flashcards_mut(), stdin.lock(), &mut stdout)?;
    Ok(())
}

async fn check_links(ctx: &AppContext, args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let prune_root = match (args.prune, SiteRoot::parse(&args.config.site)) {
        (false, _) => None,
        (true, SiteRoot::Dir(root)) => Some(root),
        (true, SiteRoot::Http(_)) => {
            warn!(site = %args.config.site, "--prune needs a site directory; only reporting");
            None
        }
    };

    let report = links::check_links(ctx, &HttpLinkChecker::new(), prune_root.as_deref()).await?;
    for link in &report.dead {
        println!("{:<6} {} <{}> ({})", link.topic_id, link.title, link.url, link.reason);
    }
    for path in &report.pruned {
        println!("upraveno: {}", path.display());
    }
    println!();
    println!(
        "Nefunkčních odkazů: {} (témat: {})",
        report.dead.len(),
        report.checked_topics
    );
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let args = Args::parse(cmd, Config::from_env(), &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let ctx = build_context(&args.config)?;

    match cmd {
        Command::Index => show_index(&ctx).await,
        Command::Topic => show_topic(&ctx, args).await,
        Command::Complete => complete(&ctx, args).await,
        Command::Review => start_review(&ctx, args).await,
        Command::Export => {
            let out = args.out.unwrap_or_default();
            for path in export::export_site(&ctx, &out).await? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::CheckLinks => check_links(&ctx, args).await,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
