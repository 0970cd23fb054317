use serde::Serialize;
use std::collections::BTreeMap;

/// Protocol a probe was issued over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Protocol {
    #[serde(rename = "HTTPS")]
    Https,
    #[serde(rename = "HTTP")]
    Http,
}

impl Protocol {
    pub fn scheme(self) -> &'static str {
        match self {
            Protocol::Https => "https",
            Protocol::Http => "http",
        }
    }
}

/// Result of a single probe: either a terminal HTTP response (any status
/// code, including 4xx/5xx) or a classified transport failure. Whether a
/// response means "online" is decided by the caller, not here.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProbeOutcome {
    Success(ProbeSuccess),
    Failure(ProbeFailure),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSuccess {
    pub status: u16,
    pub status_text: String,
    /// Response headers, last value wins on duplicate names. Ordered map so
    /// identical responses serialize identically.
    pub headers: BTreeMap<String, String>,
    /// Milliseconds from request dispatch to response headers received.
    pub duration_ms: u64,
    /// First 1000 characters of the decoded body.
    pub body_prefix: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeFailure {
    pub error_kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// No terminal response within the per-probe deadline
    Timeout,
    /// DNS, connect, TLS or protocol failure below the HTTP layer
    NetworkError,
    /// Anything else (e.g. an unbuildable request)
    Other,
}
