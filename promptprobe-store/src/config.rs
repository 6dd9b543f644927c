//! Configuration management.

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};
use promptprobe_core::{CandidatePlan, EndpointTemplate, GenerationParams, KEY_PLACEHOLDER};
use promptprobe_fetch::{
    wire, CredentialSource, EnvCredentials, HttpClient, HttpError, ProbeSettings, SystemKeychain,
    DEFAULT_CREDENTIAL_NAME,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

// ============================================================================
// Sections
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoints and models.
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Where the API key comes from.
    #[serde(default)]
    pub credential: CredentialConfig,
    /// Probe timing and prompt.
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Sampling parameters.
    #[serde(default)]
    pub generation: GenerationParams,
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Endpoint templates, tried in order (outer loop).
    #[serde(default = "default_templates")]
    pub templates: Vec<String>,
    /// Model identifiers, tried in order (inner loop).
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Model discovery URL with a `{key}` placeholder.
    #[serde(default = "default_models_url")]
    pub models_url: String,
    /// Hosts the HTTP client may contact. Empty allows any host.
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
}

/// Source of the API key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSourceKind {
    /// Environment variable.
    #[default]
    Env,
    /// System keychain.
    Keychain,
}

/// Credential configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Where to read the key from.
    #[serde(default)]
    pub source: CredentialSourceKind,
    /// Variable or keychain entry name.
    #[serde(default = "default_credential_name")]
    pub name: String,
}

/// Probe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Timeout for each upstream call, in seconds.
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_secs: u64,
    /// Optional bound on a whole probe, in seconds.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
    /// Instruction text placed before the question. `null` sends the bare
    /// question.
    #[serde(default = "default_preamble")]
    pub preamble: Option<String>,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_templates() -> Vec<String> {
    wire::DEFAULT_TEMPLATES.iter().map(ToString::to_string).collect()
}

fn default_models() -> Vec<String> {
    wire::DEFAULT_MODELS.iter().map(ToString::to_string).collect()
}

fn default_models_url() -> String {
    wire::DEFAULT_MODELS_URL.to_string()
}

fn default_allowed_domains() -> Vec<String> {
    vec![wire::DEFAULT_API_HOST.to_string()]
}

fn default_credential_name() -> String {
    DEFAULT_CREDENTIAL_NAME.to_string()
}

fn default_attempt_timeout() -> u64 {
    30
}

#[allow(clippy::unnecessary_wraps)]
fn default_preamble() -> Option<String> {
    Some(wire::DEFAULT_PREAMBLE.to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            models: default_models(),
            models_url: default_models_url(),
            allowed_domains: default_allowed_domains(),
        }
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            source: CredentialSourceKind::default(),
            name: default_credential_name(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout(),
            deadline_secs: None,
            preamble: default_preamble(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ============================================================================
// Load / Save
// ============================================================================

impl Config {
    /// Loads configuration from the default path.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&default_config_path()).await
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults. The result is validated.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        let config: Config = match load_json(path).await {
            Ok(config) => {
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.save_to(&default_config_path()).await
    }

    /// Saves configuration to a specific path.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        self.validate()?;
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks the configuration for values the prober cannot run with.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.upstream.templates.is_empty() {
            return Err(StoreError::Config("upstream.templates must not be empty".into()));
        }
        if self.upstream.models.is_empty() {
            return Err(StoreError::Config("upstream.models must not be empty".into()));
        }
        if !self.upstream.models_url.contains(KEY_PLACEHOLDER) {
            return Err(StoreError::Config(format!(
                "upstream.models_url must contain {KEY_PLACEHOLDER}"
            )));
        }
        if self.probe.attempt_timeout_secs == 0 {
            return Err(StoreError::Config("probe.attempt_timeout_secs must be positive".into()));
        }
        if self.probe.deadline_secs == Some(0) {
            return Err(StoreError::Config("probe.deadline_secs must be positive".into()));
        }
        if self.credential.name.trim().is_empty() {
            return Err(StoreError::Config("credential.name must not be blank".into()));
        }

        self.plan()?;
        Ok(())
    }

    // ========================================================================
    // Prober Inputs
    // ========================================================================

    /// Builds the validated candidate plan.
    pub fn plan(&self) -> Result<CandidatePlan, StoreError> {
        let templates = self
            .upstream
            .templates
            .iter()
            .map(|t| EndpointTemplate::new(t.as_str()))
            .collect();
        Ok(CandidatePlan::try_new(templates, self.upstream.models.clone())?)
    }

    /// Builds the prober settings.
    pub fn probe_settings(&self) -> ProbeSettings {
        let mut settings = ProbeSettings {
            attempt_timeout: Duration::from_secs(self.probe.attempt_timeout_secs),
            deadline: self.probe.deadline_secs.map(Duration::from_secs),
            preamble: None,
            generation: self.generation,
            models_url: self.upstream.models_url.clone(),
        };
        if let Some(preamble) = &self.probe.preamble {
            settings = settings.with_preamble(preamble.as_str());
        }
        settings
    }

    /// Returns the configured credential source.
    pub fn credential_source(&self) -> Box<dyn CredentialSource> {
        match self.credential.source {
            CredentialSourceKind::Env => Box::new(EnvCredentials::new()),
            CredentialSourceKind::Keychain => Box::new(SystemKeychain::new()),
        }
    }

    /// Builds an HTTP client restricted to the allowed domains.
    pub fn http_client(&self) -> Result<HttpClient, HttpError> {
        let timeout = Duration::from_secs(self.probe.attempt_timeout_secs);
        Ok(HttpClient::with_timeout(timeout)?.with_allowed_domains(self.upstream.allowed_domains.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();

        let plan = config.plan().unwrap();
        assert_eq!(plan.len(), 8);
        assert_eq!(plan.models()[0], "gemini-2.5-flash");
        assert!(plan.templates()[0].as_str().contains("/v1beta/"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"upstream":{"models":["m1"]},"probe":{"deadline_secs":5}}"#).unwrap();

        assert_eq!(config.upstream.models, vec!["m1"]);
        assert_eq!(config.upstream.templates.len(), 2);
        assert_eq!(config.probe.attempt_timeout_secs, 30);
        assert_eq!(config.probe.deadline_secs, Some(5));
        assert_eq!(config.credential.name, "GEMINI_API_KEY");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_default_preamble_and_explicit_null() {
        let settings = Config::default().probe_settings();
        assert_eq!(settings.preamble.as_deref(), Some(wire::DEFAULT_PREAMBLE));

        let config: Config = serde_json::from_str(r#"{"probe":{"preamble":null}}"#).unwrap();
        assert_eq!(config.probe.preamble, None);
        assert_eq!(config.probe_settings().preamble, None);
    }

    #[test]
    fn test_credential_source_serializes_lowercase() {
        let config: Config = serde_json::from_str(r#"{"credential":{"source":"keychain"}}"#).unwrap();
        assert_eq!(config.credential.source, CredentialSourceKind::Keychain);

        let json = serde_json::to_value(&Config::default()).unwrap();
        assert_eq!(json["credential"]["source"], "env");
    }

    #[test]
    fn test_rejects_empty_lists() {
        let mut config = Config::default();
        config.upstream.templates.clear();
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));

        let mut config = Config::default();
        config.upstream.models.clear();
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_rejects_template_without_placeholders() {
        let mut config = Config::default();
        config.upstream.templates = vec!["https://example.com/models/{model}".into()];
        assert!(matches!(config.validate(), Err(StoreError::Plan(_))));
    }

    #[test]
    fn test_rejects_blank_model() {
        let mut config = Config::default();
        config.upstream.models.push("  ".into());
        assert!(matches!(config.validate(), Err(StoreError::Plan(_))));
    }

    #[test]
    fn test_rejects_zero_timeouts() {
        let mut config = Config::default();
        config.probe.attempt_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.probe.deadline_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probe_settings() {
        let mut config = Config::default();
        config.probe.attempt_timeout_secs = 5;
        config.probe.deadline_secs = Some(12);
        config.probe.preamble = Some("Be brief.".into());

        let settings = config.probe_settings();
        assert_eq!(settings.attempt_timeout, Duration::from_secs(5));
        assert_eq!(settings.deadline, Some(Duration::from_secs(12)));
        assert_eq!(settings.preamble.as_deref(), Some("Be brief."));
        assert_eq!(settings.models_url, wire::DEFAULT_MODELS_URL);
    }

    #[test]
    fn test_http_client_builds() {
        let mut config = Config::default();
        assert!(config.http_client().is_ok());

        config.upstream.allowed_domains.clear();
        assert!(config.http_client().is_ok());
    }
}
