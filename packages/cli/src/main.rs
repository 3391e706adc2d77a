// Command-line entry point for the group-page scraper.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use groupscrape::{
    Dispatcher, DocumentSource, HttpSource, JsonFileSink, ScrapeConfig, ScrapeService, Scraper,
    SelectorConfig, SettingsStore, StaticSource, TracingProgress, WaitConfig,
};

#[derive(Parser)]
#[command(
    name = "groupscrape",
    version,
    about = "Scrape posts, comments, and images from a group page"
)]
struct Cli {
    /// Group page URL to scrape
    #[arg(required_unless_present = "file")]
    url: Option<String>,

    /// Read the page snapshot from a saved HTML file instead of fetching
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Logical page URL for a saved snapshot (required with --file)
    #[arg(long, value_name = "URL")]
    source_url: Option<String>,

    /// Webhook destination (overrides WEBHOOK_URL and the stored setting)
    #[arg(long, value_name = "URL")]
    webhook: Option<String>,

    /// Persist the webhook destination to the settings file
    #[arg(long)]
    save_webhook: bool,

    /// Directory the JSON capture is written into
    #[arg(long, default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,

    /// Seconds to wait for post containers before giving up
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    /// JSON file with custom selector chains
    #[arg(long, value_name = "PATH")]
    selectors: Option<PathBuf>,

    /// Settings file location
    #[arg(
        long,
        default_value = "groupscrape-settings.json",
        value_name = "PATH"
    )]
    settings: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{} {error:#}", "error:".bright_red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = SettingsStore::new(&cli.settings);
    let webhook = resolve_webhook(&cli, &store)?;

    if cli.save_webhook {
        let url = webhook
            .as_deref()
            .context("--save-webhook needs a webhook destination to save")?;
        store
            .set_webhook_url(url)
            .context("Failed to persist webhook destination")?;
        tracing::info!(path = %store.path().display(), "webhook destination saved");
    }

    let config = build_config(&cli)?;
    let source = build_source(&cli)?;

    let sink = Arc::new(JsonFileSink::new(&cli.output_dir));
    let capture_path = sink.path();
    let service = ScrapeService::new(Scraper::new(config), Dispatcher::with_reqwest(sink));

    let response = service
        .handle(source.as_ref(), webhook.as_deref(), &TracingProgress)
        .await;

    if !response.success {
        bail!(response
            .error
            .unwrap_or_else(|| "scrape failed for an unknown reason".to_string()));
    }

    let data = response
        .data
        .context("success response without data")?;

    println!();
    println!(
        "{}",
        format!("Scraped {} ({})", data.group_name, data.group_id).bold()
    );
    println!("  {:<10} {}", "posts".bright_cyan(), data.metadata.total_posts);
    println!(
        "  {:<10} {}",
        "comments".bright_cyan(),
        data.metadata.total_comments
    );
    println!(
        "  {:<10} {}",
        "images".bright_cyan(),
        data.metadata.total_images
    );
    println!(
        "  {:<10} {}ms",
        "duration".bright_cyan(),
        data.metadata.scraping_duration_ms
    );
    println!(
        "  {:<10} {}",
        "capture".bright_cyan(),
        capture_path.display()
    );
    if let Some(reply) = &response.webhook_response {
        println!("  {:<10} {}", "webhook".bright_cyan(), reply);
    }

    Ok(())
}

/// CLI flag beats environment beats stored setting.
fn resolve_webhook(cli: &Cli, store: &SettingsStore) -> Result<Option<String>> {
    if let Some(url) = &cli.webhook {
        return Ok(Some(url.clone()));
    }
    if let Ok(url) = std::env::var("WEBHOOK_URL") {
        if !url.trim().is_empty() {
            return Ok(Some(url));
        }
    }
    store
        .webhook_url()
        .context("Failed to read settings file")
}

fn build_config(cli: &Cli) -> Result<ScrapeConfig> {
    let mut config = ScrapeConfig::default();

    if let Some(path) = &cli.selectors {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read selector config {}", path.display()))?;
        let selectors: SelectorConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid selector config {}", path.display()))?;
        config = config.with_selectors(selectors);
    }

    // A saved snapshot never grows content, so inspect it exactly once.
    let wait = if cli.file.is_some() {
        WaitConfig::single_attempt()
    } else {
        WaitConfig::default().with_timeout_ms(cli.timeout_secs * 1_000)
    };

    Ok(config.with_wait(wait))
}

fn build_source(cli: &Cli) -> Result<Box<dyn DocumentSource>> {
    if let Some(path) = &cli.file {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let url = cli
            .source_url
            .clone()
            .context("--source-url is required with --file")?;
        return Ok(Box::new(StaticSource::new(url, html)));
    }

    let url = cli
        .url
        .clone()
        .context("a group page URL is required unless --file is given")?;
    Ok(Box::new(HttpSource::new(url)))
}
