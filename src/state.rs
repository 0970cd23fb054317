use reqwest::Client;

use crate::services::diagnostics::DiagnosticReporter;
use crate::services::liveness::LivenessChecker;
use crate::services::prober::Prober;

// App state
pub struct AppState {
    pub liveness: LivenessChecker,
    pub diagnostics: DiagnosticReporter,
}

impl AppState {
    /// Build the shared HTTP client and the two checkers on top of it. The
    /// client follows redirects by default, which is what probing relies on.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        let prober = Prober::new(client);

        Ok(Self {
            liveness: LivenessChecker::new(prober.clone()),
            diagnostics: DiagnosticReporter::new(prober),
        })
    }
}
