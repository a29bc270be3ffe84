//! Error types for rs-contactscrape.
//!
//! Only two conditions ever fail a page: a fetch that exhausted every mode and
//! retry, and a storage write that did not go through. Everything else an
//! extractor runs into degrades into an absent field.

use std::time::Duration;

/// Error type for scrape operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page could not be retrieved through the proxy.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The record store rejected a read or write.
    #[error("storage failed: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A required credential was not supplied.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// Configuration could not be turned into a usable client.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failure of a single proxy attempt, or of the whole fetch.
///
/// Only ever carries the *target* URL, never the proxy URL, so the API key
/// cannot leak through an error message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The proxy answered with status >= 400.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request timed out, or exceeded the per-request hard cap.
    #[error("timeout after {:.1}s for {url}", elapsed.as_secs_f64())]
    Timeout { url: String, elapsed: Duration },

    /// Connection, TLS or body-read failure.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// Every mode (and its retry) failed.
    #[error("failed to fetch {url}: {last}")]
    Exhausted { url: String, last: Box<FetchError> },
}

impl FetchError {
    /// HTTP 429, HTTP 5xx and timeouts are worth one more try.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Timeout { .. } => true,
            Self::Transport { .. } | Self::Exhausted { .. } => false,
        }
    }
}

/// Result type alias for scrape operations.
pub type Result<T> = std::result::Result<T, Error>;
