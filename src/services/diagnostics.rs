//! Raw HTTPS/HTTP probe pair for manual inspection.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::models::check::{DiagnosticReport, ProbeReport};
use crate::models::probe::{ProbeOutcome, Protocol};
use crate::services::prober::{Probe, Prober};

/// Deadline per diagnostic probe, looser than the liveness one since the
/// report also captures the body.
const PROBE_TIMEOUT: Duration = Duration::from_millis(10_000);

pub struct DiagnosticReporter {
    prober: Prober,
    probe_timeout: Duration,
}

impl DiagnosticReporter {
    pub fn new(prober: Prober) -> Self {
        Self {
            prober,
            probe_timeout: PROBE_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(prober: Prober, probe_timeout: Duration) -> Self {
        Self {
            prober,
            probe_timeout,
        }
    }

    /// One HTTPS probe and one HTTP probe, both always performed regardless
    /// of outcome, HTTPS entry first. No retries, no short-circuit, and no
    /// overall failure: two failed probes still make a well-formed report.
    pub async fn diagnose(&self, domain: &str) -> DiagnosticReport {
        let mut results = Vec::with_capacity(2);

        for protocol in [Protocol::Https, Protocol::Http] {
            let url = format!("{}://{}", protocol.scheme(), domain);
            let outcome = self.prober.probe(&url, self.probe_timeout).await;

            // Looser signal than the liveness verdict: plain < 520 with no
            // 530 exception. Kept as-is for parity with the existing debug
            // output.
            let is_online = match &outcome {
                ProbeOutcome::Success(success) => Some(success.status < 520),
                ProbeOutcome::Failure(_) => None,
            };

            results.push(ProbeReport {
                protocol,
                outcome,
                is_online,
            });
        }

        DiagnosticReport {
            domain: domain.to_string(),
            timestamp_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            results,
        }
    }
}
