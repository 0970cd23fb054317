//! Single-shot HTTP probing: one bounded-time GET, one structured outcome.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, HeaderMap, HeaderName, HeaderValue,
    PRAGMA, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

use crate::models::probe::{FailureKind, ProbeFailure, ProbeOutcome, ProbeSuccess};

/// Maximum characters of the decoded body kept in a probe outcome.
pub const BODY_PREFIX_CHARS: usize = 1000;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
     image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Fixed header set sent with every probe. Shaped like a regular browser
/// navigation so hosts doing basic bot-filtering answer normally. Not
/// configurable per call. Accept-Encoding is left to the client, which
/// negotiates and transparently decodes compression.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("none"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-user"),
        HeaderValue::from_static("?1"),
    );
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

/// Probing capability the checkers run on. A trait seam so checker logic can
/// be driven by a scripted double in tests.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome;
}

#[derive(Clone)]
pub struct Prober {
    client: Client,
    headers: HeaderMap,
}

impl Prober {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            headers: browser_headers(),
        }
    }
}

#[async_trait]
impl Probe for Prober {
    /// One GET against `url`, bounded by `timeout` measured from call start.
    /// Redirects are followed; the post-redirect response is what gets
    /// reported. Any terminal response, error statuses included, is a
    /// `Success` here; transport failures come back classified, never raised.
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        let started = Instant::now();

        let response = match self
            .client
            .get(url)
            .headers(self.headers.clone())
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::Failure(classify_error(&e)),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        let status = response.status();
        let headers = collect_headers(response.headers());

        // Headers have arrived, so the probe already counts as terminal. The
        // body read runs inside what remains of the same deadline and cannot
        // demote the outcome.
        let body_prefix = match response.text().await {
            Ok(text) => truncate_chars(&text, BODY_PREFIX_CHARS),
            Err(_) => String::new(),
        };

        ProbeOutcome::Success(ProbeSuccess {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            duration_ms,
            body_prefix,
        })
    }
}

fn classify_error(err: &reqwest::Error) -> ProbeFailure {
    let error_kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() || err.is_request() || err.is_redirect() {
        FailureKind::NetworkError
    } else {
        FailureKind::Other
    };

    ProbeFailure {
        error_kind,
        message: error_chain(err),
    }
}

/// Flatten the error and its sources into one message; the top-level reqwest
/// error alone usually hides the interesting part (DNS, connect, TLS).
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (name, value) in headers {
        // Duplicate header names: last value wins
        map.insert(
            name.as_str().to_string(),
            String::from_utf8_lossy(value.as_bytes()).to_string(),
        );
    }
    map
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
