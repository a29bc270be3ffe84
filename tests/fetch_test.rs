mod common;

use std::io::Write;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use rs_contactscrape::extractor::{self, Page, PageContext};
use rs_contactscrape::fetch::{FetchMode, ProxyConfig, ProxyFetcher, RawResponse};
use rs_contactscrape::{FetchError, Options};

use common::{ok, status, test_config, ScriptedTransport};

const TARGET: &str = "https://filmfreeway.com/ExampleFilmFestival";

fn fetcher(script: Vec<Result<RawResponse, FetchError>>) -> ProxyFetcher<ScriptedTransport> {
    ProxyFetcher::new(test_config(), ScriptedTransport::new(script))
}

#[test]
fn rate_limited_then_success_retries_once_in_static_mode() {
    let fetcher = fetcher(vec![status(429), ok("<h1>Second</h1>")]);

    let html = fetcher.fetch(TARGET, None).expect("second attempt succeeds");

    assert_eq!(html, "<h1>Second</h1>");
    assert_eq!(fetcher.transport().modes(), vec![FetchMode::Static, FetchMode::Static]);
}

#[test]
fn permanent_static_failure_falls_back_to_rendered_without_retry() {
    let fetcher = fetcher(vec![status(404), ok("<h1>Rendered</h1>")]);

    let html = fetcher.fetch(TARGET, None).expect("rendered mode succeeds");

    assert_eq!(html, "<h1>Rendered</h1>");
    assert_eq!(fetcher.transport().modes(), vec![FetchMode::Static, FetchMode::Rendered]);
}

#[test]
fn two_server_errors_move_on_to_rendered() {
    let fetcher = fetcher(vec![status(503), status(500), ok("<p>ok</p>")]);

    fetcher.fetch(TARGET, None).expect("rendered mode succeeds");

    assert_eq!(
        fetcher.transport().modes(),
        vec![FetchMode::Static, FetchMode::Static, FetchMode::Rendered]
    );
}

#[test]
fn every_mode_failing_is_exhausted_with_last_error() {
    let fetcher = fetcher(vec![status(503), status(503), status(502), status(429)]);

    let err = fetcher.fetch(TARGET, None).expect_err("all attempts fail");

    assert_eq!(fetcher.transport().calls().len(), 4);
    match err {
        FetchError::Exhausted { url, last } => {
            assert_eq!(url, TARGET);
            assert_eq!(
                *last,
                FetchError::Status {
                    url: TARGET.to_string(),
                    status: 429
                }
            );
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
}

#[test]
fn transport_errors_are_not_retried() {
    let fetcher = fetcher(vec![
        Err(FetchError::Transport {
            url: TARGET.to_string(),
            message: "connection refused".to_string(),
        }),
        ok("<p>rendered</p>"),
    ]);

    assert_eq!(fetcher.fetch(TARGET, None).expect("rendered"), "<p>rendered</p>");
    assert_eq!(fetcher.transport().modes(), vec![FetchMode::Static, FetchMode::Rendered]);
}

#[test]
fn rendered_only_fetch_uses_render_flag() {
    let fetcher = fetcher(vec![ok("<p>rendered</p>")]);

    fetcher.fetch_rendered(TARGET, None).expect("rendered");

    let calls = fetcher.transport().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].mode, FetchMode::Rendered);
    assert!(calls[0].proxy_url.contains("render=true"));
}

#[test]
fn error_text_never_contains_the_api_key() {
    let fetcher = fetcher(vec![status(500), status(500), status(500), status(500)]);

    let err = fetcher.fetch(TARGET, None).expect_err("all attempts fail");

    let shown = format!("{err} {err:?}");
    assert!(!shown.contains("test-secret-key"));
    assert!(!format!("{:?}", fetcher.config()).contains("test-secret-key"));
}

#[test]
fn proxy_url_carries_target_and_session() {
    let fetcher = fetcher(vec![ok("<p>ok</p>")]);
    fetcher.fetch(TARGET, None).expect("ok");

    let call = &fetcher.transport().calls()[0];
    assert_eq!(call.target, TARGET);
    assert!(call.proxy_url.contains("api_key=test-secret-key"));
    assert!(call.proxy_url.contains("session_number=1001"));
    assert!(call.proxy_url.contains("country_code=us"));
    assert!(!call.proxy_url.contains("render="));
}

#[test]
fn referer_defaults_to_target_and_can_be_overridden() {
    let fetcher = fetcher(vec![ok("a"), ok("b")]);

    fetcher.fetch(TARGET, None).expect("ok");
    fetcher
        .fetch(TARGET, Some("https://filmfreeway.com/festivals"))
        .expect("ok");

    let calls = fetcher.transport().calls();
    assert_eq!(calls[0].referer, TARGET);
    assert_eq!(calls[1].referer, "https://filmfreeway.com/festivals");
}

#[test]
fn configured_referer_is_used_when_none_given() {
    let config = ProxyConfig {
        referer: Some("https://filmfreeway.com/".to_string()),
        ..test_config()
    };
    let fetcher = ProxyFetcher::new(config, ScriptedTransport::new(vec![ok("a")]));

    fetcher.fetch(TARGET, None).expect("ok");

    assert_eq!(fetcher.transport().calls()[0].referer, "https://filmfreeway.com/");
}

#[test]
fn gzip_body_is_decompressed() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"<h1>Zipped Fest</h1>").expect("write");
    let body = encoder.finish().expect("finish");

    let response = RawResponse {
        content_encoding: Some("gzip".to_string()),
        body,
        ..RawResponse::ok(Vec::new())
    };
    let fetcher = fetcher(vec![Ok(response)]);

    assert_eq!(fetcher.fetch(TARGET, None).expect("ok"), "<h1>Zipped Fest</h1>");
}

#[test]
fn header_charset_decodes_body() {
    let response = RawResponse {
        content_type: Some("text/html; charset=ISO-8859-1".to_string()),
        body: b"<h1>Caf\xE9</h1>".to_vec(),
        ..RawResponse::ok(Vec::new())
    };
    let fetcher = fetcher(vec![Ok(response)]);

    assert_eq!(fetcher.fetch(TARGET, None).expect("ok"), "<h1>Café</h1>");
}

#[test]
fn slow_responses_over_hard_cap_count_as_timeouts() {
    let config = ProxyConfig {
        hard_cap: Duration::from_millis(1),
        ..test_config()
    };
    let transport = ScriptedTransport::new(vec![ok("a"), ok("b"), ok("c"), ok("d")])
        .with_latency(Duration::from_millis(20));
    let fetcher = ProxyFetcher::new(config, transport);

    let err = fetcher.fetch(TARGET, None).expect_err("every attempt is too slow");

    assert_eq!(fetcher.transport().calls().len(), 4);
    match err {
        FetchError::Exhausted { last, .. } => assert!(matches!(*last, FetchError::Timeout { .. })),
        other => panic!("expected Exhausted, got {other:?}"),
    }
}

#[test]
fn fetcher_supplies_rendered_copy_to_extraction() {
    // Static page has only a placeholder; the rendered copy has the real link.
    let fetcher = fetcher(vec![ok(
        r#"<a title="Visit website" href="https://rendered.example.org/">Visit website</a>"#,
    )]);
    let page = Page::parse(
        TARGET,
        r#"<h1>Fest</h1><a title="Visit website" href="javascript:void(0)">Visit website</a>"#,
    );
    let ctx = PageContext::new(&page, &fetcher);

    let record = extractor::extract_record(&ctx, &Options::default());

    assert_eq!(record.website.as_deref(), Some("https://rendered.example.org/"));
    assert_eq!(fetcher.transport().modes(), vec![FetchMode::Rendered]);
}

#[test]
fn failed_render_leaves_website_absent() {
    let fetcher = fetcher(vec![status(404)]);
    let page = Page::parse(
        TARGET,
        r#"<h1>Fest</h1><a title="Visit website" href="javascript:void(0)">Visit website</a>"#,
    );
    let ctx = PageContext::new(&page, &fetcher);

    let record = extractor::extract_record(&ctx, &Options::default());

    assert_eq!(record.website, None);
    assert_eq!(record.name.as_deref(), Some("Fest"));
    assert_eq!(fetcher.transport().calls().len(), 1);
}
