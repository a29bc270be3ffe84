//! Network transport for proxy requests.
//!
//! [`Transport`] is the only place the fetcher touches the network, so tests
//! substitute a scripted implementation and exercise retry and fallback
//! without sockets.

use std::time::Instant;

use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, CONTENT_ENCODING,
    CONTENT_TYPE, REFERER, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use tracing::info;

use super::{ProxyConfig, ProxyRequest};
use crate::error::{Error, FetchError};
use crate::patterns::mask_key;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Status, relevant headers and undecoded body of one proxy response.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub content_encoding: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// A 200 response with a plain body.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            ..Self::default()
        }
    }

    /// An empty response with the given status.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Issues one GET for a proxy request.
///
/// Implementations report timeouts as [`FetchError::Timeout`] and every other
/// I/O failure as [`FetchError::Transport`], always naming the target URL
/// rather than the proxy URL.
pub trait Transport {
    fn get(&self, request: &ProxyRequest, referer: &str) -> Result<RawResponse, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, request: &ProxyRequest, referer: &str) -> Result<RawResponse, FetchError> {
        (**self).get(request, referer)
    }
}

/// Blocking `reqwest` transport with browser-like headers.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build the client with the configured timeouts and default headers.
    pub fn new(config: &ProxyConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("invalid user agent: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.hard_cap)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        info!(
            connect_timeout = ?config.connect_timeout,
            hard_cap = ?config.hard_cap,
            "HTTP transport initialized"
        );
        Ok(Self { client })
    }

    fn map_error(err: reqwest::Error, request: &ProxyRequest, start: Instant) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout {
                url: request.target().to_string(),
                elapsed: start.elapsed(),
            };
        }
        FetchError::Transport {
            url: request.target().to_string(),
            message: mask_key(&err.without_url().to_string()),
        }
    }
}

fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

impl Transport for ReqwestTransport {
    fn get(&self, request: &ProxyRequest, referer: &str) -> Result<RawResponse, FetchError> {
        let start = Instant::now();
        let response = self
            .client
            .get(request.url().clone())
            .header(REFERER, referer)
            .send()
            .map_err(|e| Self::map_error(e, request, start))?;

        let status = response.status().as_u16();
        let content_encoding = header_string(response.headers(), CONTENT_ENCODING);
        let content_type = header_string(response.headers(), CONTENT_TYPE);
        let body = response
            .bytes()
            .map_err(|e| Self::map_error(e, request, start))?
            .to_vec();

        Ok(RawResponse {
            status,
            content_encoding,
            content_type,
            body,
        })
    }
}
