//! Batch runner: fetch each seed page through the proxy, extract its contact
//! fields and upsert them into SQLite.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rs_contactscrape::fetch::{ProxyConfig, ProxyFetcher, API_KEY_ENV, TIMEOUT_ENV};
use rs_contactscrape::orchestrator::Orchestrator;
use rs_contactscrape::storage::{RecordStore, SqliteStore};
use rs_contactscrape::Options;

const DEFAULT_SEEDS: &[&str] = &[
    "https://filmfreeway.com/CommffestGlobalCommunityFilmFestival",
    "https://filmfreeway.com/InternationalMediaFestivalOfWales",
];

#[derive(Parser)]
#[command(name = "contact-scrape")]
#[command(about = "Scrape contact fields from profile pages into SQLite")]
#[command(version)]
struct Cli {
    /// Proxy API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Total time allowed per request, in seconds
    #[arg(long, env = TIMEOUT_ENV, default_value = "60")]
    timeout_secs: u64,

    /// SQLite database file
    #[arg(long, default_value = "data.sqlite")]
    db: PathBuf,

    /// Pause between pages, in milliseconds
    #[arg(long, default_value = "1000")]
    delay_ms: u64,

    /// Country hint for the proxy
    #[arg(long, default_value = "us")]
    country: String,

    /// Proxy session number
    #[arg(long, default_value = "1001")]
    session: u32,

    /// Referer sent with the first request for each page
    #[arg(long, default_value = "https://filmfreeway.com/festivals")]
    referer: String,

    /// File with one seed URL per line (`#` starts a comment)
    #[arg(long)]
    seeds_file: Option<PathBuf>,

    /// Seed URLs; the built-in list is used when none are given
    seeds: Vec<String>,
}

fn read_seeds(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut seeds = cli.seeds.clone();
    if let Some(path) = &cli.seeds_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading seeds from {}", path.display()))?;
        seeds.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(str::to_string),
        );
    }
    if seeds.is_empty() {
        seeds = DEFAULT_SEEDS.iter().map(|s| (*s).to_string()).collect();
    }
    Ok(seeds)
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rs_contactscrape=info,contact_scrape=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let base = ProxyConfig::from_key(cli.api_key.clone())
        .with_context(|| format!("set {API_KEY_ENV} (or pass --api-key) before running"))?;
    let config = ProxyConfig {
        country_code: cli.country.clone(),
        session_number: cli.session,
        hard_cap: Duration::from_secs(cli.timeout_secs),
        referer: Some(cli.referer.clone()),
        ..base
    };
    let seeds = read_seeds(&cli)?;

    let fetcher = ProxyFetcher::with_http(config).context("building HTTP client")?;
    let store = SqliteStore::open(&cli.db).with_context(|| format!("opening {}", cli.db.display()))?;

    let mut orchestrator = Orchestrator::new(fetcher, store, Options::default())
        .with_referer(Some(cli.referer.clone()))
        .with_delay(Duration::from_millis(cli.delay_ms));

    let summary = orchestrator.run(&seeds);
    info!(
        stored = orchestrator.store().count()?,
        succeeded = summary.succeeded,
        failed = summary.failed.len(),
        "run complete"
    );
    println!("done");
    Ok(())
}
