//! The fallback prober.
//!
//! Walks the candidate plan in order (templates outer, models inner) and
//! returns the first non-blank answer. Each candidate is tried exactly once;
//! the traversal itself is the retry strategy. Calls are strictly
//! sequential, so worst-case latency is the sum of every per-call timeout
//! unless an outer deadline is configured.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use promptprobe_core::{
    Answer, ApiKey, AttemptFailure, Candidate, CandidatePlan, GenerationParams, KEY_PLACEHOLDER,
    ProbeAttempt, ProbeRequest,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{AttemptError, ProbeError};
use crate::host::credential::{CredentialSource, DEFAULT_CREDENTIAL_NAME};
use crate::host::http::{DEFAULT_TIMEOUT, HttpClient, HttpTransport};
use crate::wire;

/// Maximum number of URL characters written to logs per attempt.
const LOGGED_URL_LEN: usize = 80;

// ============================================================================
// Probe Settings
// ============================================================================

/// Settings for probe execution.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Timeout for each candidate call.
    pub attempt_timeout: Duration,
    /// Optional deadline for the whole probe. `None` tries every candidate.
    pub deadline: Option<Duration>,
    /// Text placed before the question in the prompt.
    pub preamble: Option<String>,
    /// Sampling parameters.
    pub generation: GenerationParams,
    /// Model discovery URL with a `{key}` placeholder.
    pub models_url: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            attempt_timeout: DEFAULT_TIMEOUT,
            deadline: None,
            preamble: None,
            generation: GenerationParams::default(),
            models_url: wire::DEFAULT_MODELS_URL.to_string(),
        }
    }
}

impl ProbeSettings {
    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Sets the outer deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the prompt preamble.
    #[must_use]
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }
}

// ============================================================================
// Probe Outcome
// ============================================================================

/// The outcome of one probe.
#[derive(Debug)]
pub struct ProbeOutcome {
    /// The answer or the terminal error.
    pub result: Result<Answer, ProbeError>,
    /// All attempts made, in order.
    pub attempts: Vec<ProbeAttempt>,
    /// Total duration of the probe.
    pub duration: Duration,
}

impl ProbeOutcome {
    /// Returns true if the probe produced an answer.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the number of candidates that were tried.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the model that answered, if any.
    pub fn successful_model(&self) -> Option<&str> {
        self.result.as_ref().ok().map(|a| a.candidate.model.as_str())
    }

    /// Returns all attempt errors, in order.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }
}

fn failures_of(attempts: &[ProbeAttempt]) -> Vec<AttemptFailure> {
    attempts.iter().filter_map(ProbeAttempt::as_failure).collect()
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

// ============================================================================
// Fallback Prober
// ============================================================================

/// Tries candidates in order until one answers.
///
/// Holds only immutable state, so one prober can serve concurrent probes
/// from many tasks.
pub struct FallbackProber {
    transport: Arc<dyn HttpTransport>,
    api_key: ApiKey,
    plan: CandidatePlan,
    settings: ProbeSettings,
}

impl FallbackProber {
    /// Creates a prober from its parts.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        api_key: ApiKey,
        plan: CandidatePlan,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            transport,
            api_key,
            plan,
            settings,
        }
    }

    /// Creates a builder for constructing a prober.
    pub fn builder() -> FallbackProberBuilder {
        FallbackProberBuilder::new()
    }

    /// Returns the candidate plan.
    pub fn plan(&self) -> &CandidatePlan {
        &self.plan
    }

    /// Returns the probe settings.
    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Asks a question and returns the first answer.
    ///
    /// # Errors
    /// Returns [`ProbeError::UpstreamExhausted`] with every per-candidate
    /// error when no candidate answers.
    pub async fn probe(&self, question: &str) -> Result<Answer, ProbeError> {
        self.execute(&ProbeRequest::new(question)).await.result
    }

    /// Runs a probe and returns the answer along with the attempt log.
    #[instrument(skip(self, request), fields(candidates = self.plan.len()))]
    pub async fn execute(&self, request: &ProbeRequest) -> ProbeOutcome {
        let start = Instant::now();
        let mut attempts = Vec::with_capacity(self.plan.len());

        if self.plan.is_empty() {
            return ProbeOutcome {
                result: Err(ProbeError::NoCandidates),
                attempts,
                duration: start.elapsed(),
            };
        }

        if request.is_blank() {
            debug!("Blank question, sending anyway");
        }

        info!(count = self.plan.len(), "Executing probe");

        let deadline = self
            .settings
            .deadline
            .map(|d| (d, tokio::time::Instant::now() + d));
        let prompt = request.prompt(self.settings.preamble.as_deref());
        let body = wire::request_body(&prompt, &self.settings.generation);

        for candidate in self.plan.candidates() {
            if let Some((limit, at)) = deadline {
                if tokio::time::Instant::now() >= at {
                    warn!(deadline = ?limit, "Probe deadline reached");
                    return ProbeOutcome {
                        result: Err(ProbeError::DeadlineExceeded {
                            deadline: limit,
                            failures: failures_of(&attempts),
                        }),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
            }

            let started_at = Utc::now();
            let attempt_start = Instant::now();
            debug!(
                model = %candidate.model,
                url = %truncate(&candidate.redacted_url(), LOGGED_URL_LEN),
                "Trying candidate"
            );

            let call = self.attempt(&candidate, &body);
            let result = match deadline {
                Some((limit, at)) => {
                    let bounded = tokio::time::timeout_at(at, call).await;
                    if let Ok(result) = bounded {
                        result
                    } else {
                        warn!(model = %candidate.model, deadline = ?limit, "Probe deadline reached mid-call");
                        attempts.push(ProbeAttempt::failure(
                            candidate,
                            format!("cancelled: probe deadline of {limit:?} reached"),
                            started_at,
                            attempt_start.elapsed(),
                        ));
                        return ProbeOutcome {
                            result: Err(ProbeError::DeadlineExceeded {
                                deadline: limit,
                                failures: failures_of(&attempts),
                            }),
                            attempts,
                            duration: start.elapsed(),
                        };
                    }
                }
                None => call.await,
            };

            let duration = attempt_start.elapsed();
            match result {
                Ok(text) => {
                    info!(model = %candidate.model, duration = ?duration, "Candidate answered");
                    attempts.push(ProbeAttempt::success(candidate.clone(), started_at, duration));
                    return ProbeOutcome {
                        result: Ok(Answer { text, candidate }),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
                Err(error) => {
                    warn!(
                        model = %candidate.model,
                        error = %error,
                        duration = ?duration,
                        "Candidate failed"
                    );
                    attempts.push(ProbeAttempt::failure(
                        candidate,
                        error.to_string(),
                        started_at,
                        duration,
                    ));
                }
            }
        }

        warn!(attempts = attempts.len(), "All candidates failed");
        ProbeOutcome {
            result: Err(ProbeError::UpstreamExhausted {
                failures: failures_of(&attempts),
            }),
            attempts,
            duration: start.elapsed(),
        }
    }

    /// Calls one candidate and extracts its answer.
    async fn attempt(
        &self,
        candidate: &Candidate,
        body: &serde_json::Value,
    ) -> Result<String, AttemptError> {
        let url = candidate.url(&self.api_key);
        let response = self
            .transport
            .post_json(&url, body, self.settings.attempt_timeout)
            .await?;

        if !response.is_success() {
            debug!(status = response.status, body = %response.body, "Upstream rejected request");
            let message = wire::extract_error_message(&response.body)
                .unwrap_or_else(|| format!("upstream returned HTTP {}", response.status));
            return Err(AttemptError::UpstreamRejected {
                model: candidate.model.clone(),
                status: response.status,
                message,
            });
        }

        wire::extract_answer(&response.body)
    }

    /// Lists model names available to the key.
    ///
    /// Listing is informational: any failure is logged and yields an empty
    /// list.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => {
                info!(count = models.len(), "Listed models");
                models
            }
            Err(error) => {
                warn!(error = %error, "Failed to list models");
                Vec::new()
            }
        }
    }

    async fn fetch_models(&self) -> Result<Vec<String>, AttemptError> {
        let url = self
            .settings
            .models_url
            .replace(KEY_PLACEHOLDER, self.api_key.expose());
        let response = self
            .transport
            .get(&url, self.settings.attempt_timeout)
            .await?;

        if !response.is_success() {
            let message = wire::extract_error_message(&response.body)
                .unwrap_or_else(|| format!("upstream returned HTTP {}", response.status));
            return Err(AttemptError::UpstreamRejected {
                model: "models".to_string(),
                status: response.status,
                message,
            });
        }

        let models = wire::parse_model_names(&response.body)?;
        for model in &models {
            debug!(model = %model, "Found model");
        }
        Ok(models)
    }
}

impl std::fmt::Debug for FallbackProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackProber")
            .field("plan", &self.plan)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fallback Prober Builder
// ============================================================================

/// Builder for constructing a [`FallbackProber`].
pub struct FallbackProberBuilder {
    transport: Option<Arc<dyn HttpTransport>>,
    plan: CandidatePlan,
    settings: ProbeSettings,
    credential_name: String,
}

impl FallbackProberBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            transport: None,
            plan: CandidatePlan::default(),
            settings: ProbeSettings::default(),
            credential_name: DEFAULT_CREDENTIAL_NAME.to_string(),
        }
    }

    /// Sets the HTTP transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the candidate plan.
    #[must_use]
    pub fn plan(mut self, plan: CandidatePlan) -> Self {
        self.plan = plan;
        self
    }

    /// Sets the probe settings.
    #[must_use]
    pub fn settings(mut self, settings: ProbeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the name of the credential to load.
    #[must_use]
    pub fn credential_name(mut self, name: impl Into<String>) -> Self {
        self.credential_name = name.into();
        self
    }

    /// Loads the credential once and builds the prober.
    ///
    /// Without an explicit transport a default [`HttpClient`] is created.
    ///
    /// # Errors
    /// Fails fast if the credential is missing or blank.
    pub async fn build(self, credentials: &dyn CredentialSource) -> Result<FallbackProber, ProbeError> {
        let api_key = credentials.get_secret(&self.credential_name).await?;

        info!(
            credential = %self.credential_name,
            key_len = api_key.len(),
            key_prefix = %api_key.masked(),
            "Credential loaded"
        );

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::new()?),
        };

        Ok(FallbackProber::new(transport, api_key, self.plan, self.settings))
    }
}

impl Default for FallbackProberBuilder {
    fn default() -> Self {
        Self::new()
    }
}
