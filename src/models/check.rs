use serde::{Deserialize, Serialize};

use crate::models::probe::{ProbeOutcome, Protocol};

// Wire types for the two check endpoints

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub domain: String,
}

/// Response envelope of the liveness endpoint. `status` duplicates the HTTP
/// status at the application level, matching the existing wire format.
#[derive(Debug, Serialize)]
pub struct CheckEnvelope {
    pub status: u16,
    pub message: String,
    pub data: Option<CheckResult>,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
}

impl CheckEnvelope {
    pub fn completed(is_online: bool) -> Self {
        let status = if is_online { "online" } else { "offline" };

        Self {
            status: 200,
            message: "Check completed".to_string(),
            data: Some(CheckResult {
                status: status.to_string(),
            }),
        }
    }
}

/// Raw HTTPS/HTTP probe pair returned by the diagnostic endpoint. Always two
/// entries, HTTPS first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub domain: String,
    pub timestamp_utc: String,
    pub results: Vec<ProbeReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub protocol: Protocol,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    /// Looser per-probe signal (plain `< 520`), only present on success.
    /// Not the authoritative liveness verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
}
