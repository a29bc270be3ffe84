//! Page retrieval through the rendering proxy.
//!
//! Each page is tried in static mode first and rendered mode second. Within a
//! mode, a transient failure (429, 5xx, timeout) earns exactly one retry after
//! a short sleep; anything else moves straight on. The transitions live in
//! [`next_state`] so they can be checked without a network.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use url::Url;

use crate::error::{Error, FetchError};
use crate::extractor::RenderSource;
use crate::patterns::mask_key;

pub mod decode;
pub mod transport;

pub use decode::{ContentEncoding, DecodeError, FetchResult};
pub use transport::{RawResponse, ReqwestTransport, Transport};

/// Environment variable holding the proxy API key.
pub const API_KEY_ENV: &str = "MORPH_SCRAPERAPI";

/// Environment variable overriding the per-request hard cap, in seconds.
pub const TIMEOUT_ENV: &str = "SCRAPER_TIMEOUT_SECS";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Proxy connection settings.
#[derive(Clone)]
pub struct ProxyConfig {
    /// Proxy API endpoint.
    ///
    /// Default: `"https://api.scraperapi.com/"`
    pub endpoint: String,

    /// Proxy API key. Never logged.
    pub api_key: String,

    /// Country hint passed to the proxy.
    ///
    /// Default: `"us"`
    pub country_code: String,

    /// Sticky session number, so consecutive requests share an exit IP.
    ///
    /// Default: `1001`
    pub session_number: u32,

    /// Default: 15 s
    pub connect_timeout: Duration,

    /// Total time allowed for one attempt, connect to last body byte. The
    /// HTTP client aborts at this limit, and an attempt whose transport
    /// returns later than this still fails.
    ///
    /// Default: 60 s
    pub hard_cap: Duration,

    /// Sleep before the single retry of a transient failure.
    ///
    /// Default: 1 s
    pub retry_delay: Duration,

    pub user_agent: String,

    /// `Referer` sent when the caller gives none. `None` sends the target URL.
    pub referer: Option<String>,
}

impl ProxyConfig {
    /// Defaults with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: "https://api.scraperapi.com/".to_string(),
            api_key: api_key.into(),
            country_code: "us".to_string(),
            session_number: 1001,
            connect_timeout: Duration::from_secs(15),
            hard_cap: Duration::from_secs(60),
            retry_delay: Duration::from_secs(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: None,
        }
    }

    /// Defaults with `api_key`, which must be present and non-blank.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_contactscrape::fetch::ProxyConfig;
    /// use rs_contactscrape::Error;
    ///
    /// assert!(ProxyConfig::from_key(Some("k".to_string())).is_ok());
    /// assert!(matches!(ProxyConfig::from_key(None), Err(Error::MissingCredential(_))));
    /// ```
    pub fn from_key(api_key: Option<String>) -> crate::Result<Self> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(Error::MissingCredential(API_KEY_ENV))?;
        Ok(Self::new(api_key))
    }

    /// Read the API key and hard cap from the environment.
    ///
    /// A missing or blank key is an error; an unparsable timeout keeps the
    /// default.
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Self::from_key(std::env::var(API_KEY_ENV).ok())?;
        if let Some(secs) = std::env::var(TIMEOUT_ENV).ok().and_then(|v| v.trim().parse::<u64>().ok()) {
            config.hard_cap = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("country_code", &self.country_code)
            .field("session_number", &self.session_number)
            .field("connect_timeout", &self.connect_timeout)
            .field("hard_cap", &self.hard_cap)
            .field("retry_delay", &self.retry_delay)
            .field("referer", &self.referer)
            .finish_non_exhaustive()
    }
}

/// Whether the proxy should run the page's JavaScript before returning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Static,
    Rendered,
}

impl FetchMode {
    /// Mode order for a normal fetch.
    pub const FALLBACK_ORDER: [Self; 2] = [Self::Static, Self::Rendered];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Rendered => "rendered",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proxy URL for one target page in one mode.
///
/// `Display` and `Debug` mask the API key; only [`ProxyRequest::url`] exposes it.
#[derive(Clone)]
pub struct ProxyRequest {
    target: String,
    mode: FetchMode,
    url: Url,
}

impl ProxyRequest {
    pub fn build(config: &ProxyConfig, target: &str, mode: FetchMode) -> Result<Self, FetchError> {
        let mut url = Url::parse(&config.endpoint).map_err(|e| FetchError::Transport {
            url: target.to_string(),
            message: format!("invalid proxy endpoint: {e}"),
        })?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("api_key", &config.api_key)
                .append_pair("url", target)
                .append_pair("country_code", &config.country_code)
                .append_pair("session_number", &config.session_number.to_string());
            if mode == FetchMode::Rendered {
                query.append_pair("render", "true");
            }
        }
        Ok(Self {
            target: target.to_string(),
            mode,
            url,
        })
    }

    /// The page being fetched.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    /// Full proxy URL, credentials included.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Proxy URL safe to log.
    #[must_use]
    pub fn masked(&self) -> String {
        mask_key(self.url.as_str())
    }
}

impl fmt::Display for ProxyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for ProxyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRequest")
            .field("target", &self.target)
            .field("mode", &self.mode)
            .field("url", &self.masked())
            .finish()
    }
}

/// A successfully fetched page and the mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub html: String,
    pub mode: FetchMode,
}

impl Fetched {
    /// Whether the proxy already ran the page's JavaScript.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.mode == FetchMode::Rendered
    }
}

/// Result of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Decoded HTML.
    Success(String),
    /// Worth one more try in the same mode.
    Transient(FetchError),
    /// Retrying the same mode will not help.
    Permanent(FetchError),
}

impl AttemptOutcome {
    /// Classify a failure.
    #[must_use]
    pub fn from_error(err: FetchError) -> Self {
        if err.is_transient() {
            Self::Transient(err)
        } else {
            Self::Permanent(err)
        }
    }
}

/// Where a fetch stands between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// Next attempt: mode by index into the mode list, and whether this is the retry.
    Attempt { mode_index: usize, retry: bool },
    Succeeded,
    Exhausted,
}

impl FetchState {
    pub const START: Self = Self::Attempt {
        mode_index: 0,
        retry: false,
    };
}

/// Transition after an attempt in `state` produced `outcome`.
///
/// Success ends the fetch. A transient failure on a first attempt retries
/// the same mode; any other failure moves to the next mode, and past the
/// last mode the fetch is exhausted. Terminal states stay put.
#[must_use]
pub fn next_state(state: FetchState, outcome: &AttemptOutcome, mode_count: usize) -> FetchState {
    let FetchState::Attempt { mode_index, retry } = state else {
        return state;
    };
    match outcome {
        AttemptOutcome::Success(_) => FetchState::Succeeded,
        AttemptOutcome::Transient(_) if !retry => FetchState::Attempt {
            mode_index,
            retry: true,
        },
        AttemptOutcome::Transient(_) | AttemptOutcome::Permanent(_) => {
            if mode_index + 1 < mode_count {
                FetchState::Attempt {
                    mode_index: mode_index + 1,
                    retry: false,
                }
            } else {
                FetchState::Exhausted
            }
        }
    }
}

/// Fetches pages through the proxy over a [`Transport`].
#[derive(Debug)]
pub struct ProxyFetcher<T: Transport> {
    config: ProxyConfig,
    transport: T,
}

impl ProxyFetcher<ReqwestTransport> {
    /// Fetcher over a real HTTP client.
    pub fn with_http(config: ProxyConfig) -> crate::Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> ProxyFetcher<T> {
    #[must_use]
    pub fn new(config: ProxyConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `url`, static mode first, rendered mode on failure.
    pub fn fetch(&self, url: &str, referer: Option<&str>) -> Result<String, FetchError> {
        self.fetch_page(url, referer).map(|fetched| fetched.html)
    }

    /// Like [`ProxyFetcher::fetch`], also reporting which mode succeeded.
    pub fn fetch_page(&self, url: &str, referer: Option<&str>) -> Result<Fetched, FetchError> {
        self.run(url, referer, &FetchMode::FALLBACK_ORDER)
    }

    /// Fetch `url` in rendered mode only.
    pub fn fetch_rendered(&self, url: &str, referer: Option<&str>) -> Result<String, FetchError> {
        self.run(url, referer, &[FetchMode::Rendered]).map(|fetched| fetched.html)
    }

    fn run(&self, url: &str, referer: Option<&str>, modes: &[FetchMode]) -> Result<Fetched, FetchError> {
        let referer = referer.or(self.config.referer.as_deref()).unwrap_or(url);
        let mut state = FetchState::START;
        let mut last_error = None;

        while let FetchState::Attempt { mode_index, retry } = state {
            let Some(&mode) = modes.get(mode_index) else {
                break;
            };
            if retry {
                warn!(%url, %mode, delay = ?self.config.retry_delay, "retrying once");
                std::thread::sleep(self.config.retry_delay);
            }

            let outcome = self.attempt(url, mode, referer);
            state = next_state(state, &outcome, modes.len());
            match outcome {
                AttemptOutcome::Success(html) => return Ok(Fetched { html, mode }),
                AttemptOutcome::Transient(err) | AttemptOutcome::Permanent(err) => {
                    warn!(%url, %mode, error = %err, "attempt failed");
                    last_error = Some(err);
                }
            }
        }

        let last = last_error.unwrap_or_else(|| FetchError::Transport {
            url: url.to_string(),
            message: "no fetch mode attempted".to_string(),
        });
        Err(FetchError::Exhausted {
            url: url.to_string(),
            last: Box::new(last),
        })
    }

    /// One request in one mode, classified.
    fn attempt(&self, url: &str, mode: FetchMode, referer: &str) -> AttemptOutcome {
        let request = match ProxyRequest::build(&self.config, url, mode) {
            Ok(request) => request,
            Err(err) => return AttemptOutcome::Permanent(err),
        };

        info!(proxy = %request, "GET via proxy");
        let start = Instant::now();
        let response = match self.transport.get(&request, referer) {
            Ok(response) => response,
            Err(err) => return AttemptOutcome::from_error(err),
        };
        let elapsed = start.elapsed();

        if elapsed > self.config.hard_cap {
            return AttemptOutcome::Transient(FetchError::Timeout {
                url: url.to_string(),
                elapsed,
            });
        }
        if response.status >= 400 {
            return AttemptOutcome::from_error(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        let html = FetchResult {
            encoding: ContentEncoding::from_header(response.content_encoding.as_deref()),
            content_type: response.content_type,
            body: response.body,
        }
        .into_html();
        info!(proxy = %request, elapsed = ?elapsed, bytes = html.len(), "fetched");
        AttemptOutcome::Success(html)
    }
}

impl<T: Transport> RenderSource for ProxyFetcher<T> {
    fn render(&self, url: &str) -> Option<String> {
        match self.fetch_rendered(url, None) {
            Ok(html) => Some(html),
            Err(err) => {
                warn!(%url, error = %err, "rendered copy unavailable");
                None
            }
        }
    }
}
