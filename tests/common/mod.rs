//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use rs_contactscrape::fetch::{FetchMode, ProxyConfig, ProxyRequest, RawResponse, Transport};
use rs_contactscrape::FetchError;

/// One call the fake transport received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub target: String,
    pub mode: FetchMode,
    pub referer: String,
    pub proxy_url: String,
}

/// Transport that replays a script of responses and records every call.
///
/// Once the script runs out every further call gets a 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: RefCell<VecDeque<Result<RawResponse, FetchError>>>,
    calls: RefCell<Vec<Call>>,
    latency: Duration,
}

impl ScriptedTransport {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<RawResponse, FetchError>>,
    {
        Self {
            script: RefCell::new(script.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn modes(&self) -> Vec<FetchMode> {
        self.calls.borrow().iter().map(|c| c.mode).collect()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, request: &ProxyRequest, referer: &str) -> Result<RawResponse, FetchError> {
        self.calls.borrow_mut().push(Call {
            target: request.target().to_string(),
            mode: request.mode(),
            referer: referer.to_string(),
            proxy_url: request.url().to_string(),
        });
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::status(404)))
    }
}

/// Proxy settings for tests: no retry sleep.
pub fn test_config() -> ProxyConfig {
    ProxyConfig {
        retry_delay: Duration::ZERO,
        ..ProxyConfig::new("test-secret-key")
    }
}

pub fn ok(html: &str) -> Result<RawResponse, FetchError> {
    Ok(RawResponse::ok(html))
}

pub fn status(code: u16) -> Result<RawResponse, FetchError> {
    Ok(RawResponse::status(code))
}

/// A profile page with every field present.
pub const PROFILE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Example Film Festival - FilmFreeway</title>
  <script>window.__bootstrap = {"user_signed_in":false,"fonts_to_prefetch":["a.woff"]};</script>
</head>
<body>
  <div class="ModalLogin vex_content">
    <h3>Location</h3><p>Sign in to see the full address</p>
    <input type="password" class="StrongPassword">
  </div>
  <div class="festival-header" data-festival-id="4821">
    <h1>Example Film Festival</h1>
  </div>
  <div class="festival-links">
    <i class="fa fa-globe"></i>
    <a title="Visit website" href="https://example.org/?utm=1" target="_blank">Visit website</a>
    <a href="https://www.facebook.com/examplefest">Facebook</a>
  </div>
  <div class="festival-details">
    <dl>
      <dt>Location</dt>
      <dd>123 Queen St W, Toronto, ON M5V 2T6 <a href="https://maps.google.com/?q=Toronto">View Map</a></dd>
      <dt>Phone</dt>
      <dd><a href="tel:+14165551234">416-555-1234</a></dd>
    </dl>
  </div>
</body>
</html>"#;
