//! Batch processing of seed pages.
//!
//! For each seed, in order: fetch, parse, extract, store, then sleep for the
//! inter-page delay. A failing page is logged and counted; the run continues.

use std::time::Duration;

use tracing::{info, warn};

use crate::extractor::{self, Page, PageContext};
use crate::fetch::{ProxyFetcher, Transport};
use crate::storage::RecordStore;
use crate::{Options, Record, Result};

/// Counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    /// Seeds that failed, with the error message.
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

/// Owns the fetcher and the store for a run.
pub struct Orchestrator<T: Transport, S: RecordStore> {
    fetcher: ProxyFetcher<T>,
    store: S,
    options: Options,
    referer: Option<String>,
    delay: Duration,
}

impl<T: Transport, S: RecordStore> Orchestrator<T, S> {
    /// New orchestrator with the default referer and a one second delay.
    #[must_use]
    pub fn new(fetcher: ProxyFetcher<T>, store: S, options: Options) -> Self {
        Self {
            fetcher,
            store,
            options,
            referer: Some("https://filmfreeway.com/festivals".to_string()),
            delay: Duration::from_secs(1),
        }
    }

    /// Pause after every page.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `Referer` for the initial fetch of each page.
    #[must_use]
    pub fn with_referer(mut self, referer: Option<String>) -> Self {
        self.referer = referer;
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn fetcher(&self) -> &ProxyFetcher<T> {
        &self.fetcher
    }

    /// Fetch, extract and store one page.
    ///
    /// A page that only came back in rendered mode is not rendered again.
    pub fn process_page(&mut self, url: &str) -> Result<Record> {
        let fetched = self.fetcher.fetch_page(url, self.referer.as_deref())?;
        let rendered = fetched.is_rendered();
        let page = Page::parse(url, fetched.html);
        let ctx = if rendered {
            PageContext::from_rendered(&page)
        } else {
            PageContext::new(&page, &self.fetcher)
        };
        let record = extractor::extract_record(&ctx, &self.options);
        self.store.upsert(&record)?;
        Ok(record)
    }

    /// Process every seed in order.
    pub fn run<I, U>(&mut self, seeds: I) -> RunSummary
    where
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let mut summary = RunSummary::default();
        for seed in seeds {
            let url = seed.as_ref();
            match self.process_page(url) {
                Ok(record) => {
                    info!(%url, filled = record.filled_fields(), "OK");
                    summary.succeeded += 1;
                }
                Err(err) => {
                    warn!(%url, error = %err, "FAIL");
                    summary.failed.push((url.to_string(), err.to_string()));
                }
            }
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
        }
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed.len(),
            "done"
        );
        summary
    }

    /// Give back the store.
    pub fn into_store(self) -> S {
        self.store
    }
}
