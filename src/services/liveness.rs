//! Online/offline verdict: HTTPS-then-HTTP fallback with a bounded retry loop.

use std::time::Duration;

use log::{debug, warn};

use crate::models::probe::{ProbeOutcome, Protocol};
use crate::services::prober::{Probe, Prober};

/// Deadline for each individual probe within a check.
const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Full HTTPS→HTTP rounds before settling on offline.
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessVerdict {
    pub is_online: bool,
}

/// `true` when a response with this status counts as the host being online.
/// Statuses >= 520 are Cloudflare edge/origin errors and mean the origin is
/// unreachable through the edge, except 530 which stays online for
/// compatibility with the existing check behavior. Not a general HTTP rule.
pub fn classify(status: u16) -> bool {
    status < 520 || status == 530
}

pub struct LivenessChecker<P = Prober> {
    prober: P,
    attempt_timeout: Duration,
}

impl LivenessChecker {
    pub fn new(prober: Prober) -> Self {
        Self {
            prober,
            attempt_timeout: ATTEMPT_TIMEOUT,
        }
    }
}

impl<P: Probe> LivenessChecker<P> {
    #[cfg(test)]
    fn with_prober(prober: P, attempt_timeout: Duration) -> Self {
        Self {
            prober,
            attempt_timeout,
        }
    }

    /// Probe `https://{domain}` then `http://{domain}`, up to three rounds,
    /// returning as soon as any probe classifies online. Probes run strictly
    /// one after another, each under its own deadline, with no delay between
    /// rounds. Probe failures mean "not online this round", never an error:
    /// the verdict is always definite.
    pub async fn check(&self, domain: &str) -> LivenessVerdict {
        for attempt in 1..=MAX_ATTEMPTS {
            for protocol in [Protocol::Https, Protocol::Http] {
                let url = format!("{}://{}", protocol.scheme(), domain);

                match self.prober.probe(&url, self.attempt_timeout).await {
                    ProbeOutcome::Success(success) if classify(success.status) => {
                        debug!(
                            "{} is online over {} (status {}, attempt {})",
                            domain,
                            protocol.scheme(),
                            success.status,
                            attempt
                        );
                        return LivenessVerdict { is_online: true };
                    }
                    ProbeOutcome::Success(success) => {
                        warn!(
                            "{} check over {} returned status {} (attempt {})",
                            domain,
                            protocol.scheme(),
                            success.status,
                            attempt
                        );
                    }
                    ProbeOutcome::Failure(failure) => {
                        warn!(
                            "{} check over {} failed (attempt {}): {}",
                            domain,
                            protocol.scheme(),
                            attempt,
                            failure.message
                        );
                    }
                }
            }
        }

        LivenessVerdict { is_online: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::probe::{FailureKind, ProbeFailure, ProbeSuccess};
    use async_trait::async_trait;
    use reqwest::Client;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn checker(timeout: Duration) -> LivenessChecker {
        LivenessChecker::with_prober(Prober::new(Client::new()), timeout)
    }

    /// Scripted probe double: hands out the queued outcomes in order and
    /// records every URL it was asked to hit.
    struct ScriptedProber {
        outcomes: Mutex<Vec<ProbeOutcome>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProber {
        fn with(outcomes: Vec<ProbeOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Probe for ScriptedProber {
        async fn probe(&self, url: &str, _timeout: Duration) -> ProbeOutcome {
            self.calls.lock().unwrap().push(url.to_string());
            self.outcomes.lock().unwrap().remove(0)
        }
    }

    fn success(status: u16) -> ProbeOutcome {
        ProbeOutcome::Success(ProbeSuccess {
            status,
            status_text: String::new(),
            headers: BTreeMap::new(),
            duration_ms: 1,
            body_prefix: String::new(),
        })
    }

    fn timed_out() -> ProbeOutcome {
        ProbeOutcome::Failure(ProbeFailure {
            error_kind: FailureKind::Timeout,
            message: "request timed out".to_string(),
        })
    }

    #[test]
    fn classification_threshold() {
        assert!(classify(200));
        assert!(classify(301));
        assert!(classify(404));
        assert!(classify(500));
        assert!(classify(519));
        assert!(!classify(520));
        assert!(!classify(521));
        assert!(classify(530));
        assert!(!classify(531));
    }

    #[tokio::test]
    async fn first_https_success_stops_after_one_call() {
        let checker = LivenessChecker::with_prober(
            ScriptedProber::with(vec![success(200)]),
            Duration::from_secs(1),
        );

        let verdict = checker.check("example.com").await;
        assert!(verdict.is_online);
        assert_eq!(checker.prober.calls(), vec!["https://example.com"]);
    }

    #[tokio::test]
    async fn https_edge_error_falls_back_to_http_in_the_same_round() {
        let checker = LivenessChecker::with_prober(
            ScriptedProber::with(vec![success(520), success(200)]),
            Duration::from_secs(1),
        );

        let verdict = checker.check("example.com").await;
        assert!(verdict.is_online);
        assert_eq!(
            checker.prober.calls(),
            vec!["https://example.com", "http://example.com"]
        );
    }

    #[tokio::test]
    async fn timeouts_on_every_leg_cost_exactly_six_calls() {
        let checker = LivenessChecker::with_prober(
            ScriptedProber::with(vec![timed_out(); 6]),
            Duration::from_secs(1),
        );

        let verdict = checker.check("example.com").await;
        assert!(!verdict.is_online);

        let calls = checker.prober.calls();
        assert_eq!(calls.len(), 6);
        for round in 0..3 {
            assert_eq!(calls[round * 2], "https://example.com");
            assert_eq!(calls[round * 2 + 1], "http://example.com");
        }
    }

    // The mock server below speaks plain HTTP, so the HTTPS leg of every
    // round dies at the TLS handshake and only the HTTP leg reaches the
    // mock. Expected request counts are therefore HTTP legs only; the
    // scripted tests above pin down the full call counts.

    #[tokio::test]
    async fn falls_back_to_http_and_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let verdict = checker(Duration::from_secs(5))
            .check(&server.address().to_string())
            .await;
        assert!(verdict.is_online);
    }

    #[tokio::test]
    async fn status_530_counts_as_online() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(530))
            .expect(1)
            .mount(&server)
            .await;

        let verdict = checker(Duration::from_secs(5))
            .check(&server.address().to_string())
            .await;
        assert!(verdict.is_online);
    }

    #[tokio::test]
    async fn edge_error_status_exhausts_every_round() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(520))
            .expect(3)
            .mount(&server)
            .await;

        let verdict = checker(Duration::from_secs(5))
            .check(&server.address().to_string())
            .await;
        assert!(!verdict.is_online);
    }

    #[tokio::test]
    async fn timeouts_never_escape_the_checker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .expect(3)
            .mount(&server)
            .await;

        let verdict = checker(Duration::from_millis(100))
            .check(&server.address().to_string())
            .await;
        assert!(!verdict.is_online);
    }

    #[tokio::test]
    async fn unreachable_host_settles_on_offline() {
        // Bind an ephemeral port and release it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let domain = listener.local_addr().unwrap().to_string();
        drop(listener);

        let verdict = checker(Duration::from_secs(5)).check(&domain).await;
        assert!(!verdict.is_online);
    }
}
