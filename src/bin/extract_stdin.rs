//! Simple CLI that reads HTML from stdin and prints the extracted record as
//! JSON. No network access; useful for debugging extraction on saved pages.
//!
//! Usage: `extract_stdin [SOURCE_URL] < page.html`

use std::io::{self, Read};

use rs_contactscrape::extract_record_bytes;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rs_contactscrape=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let source_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "stdin://page".to_string());

    let mut html = Vec::new();
    io::stdin().read_to_end(&mut html)?;

    let record = extract_record_bytes(&html, &source_url);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
