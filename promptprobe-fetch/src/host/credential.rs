//! Credential sources for the upstream API key.
//!
//! The prober asks a [`CredentialSource`] for its key exactly once, at
//! construction. Available sources:
//! - [`EnvCredentials`] - an environment variable
//! - [`SystemKeychain`] - the system keychain (macOS Keychain, Windows
//!   Credential Manager, Linux Secret Service) via `keyring`
//! - [`StaticCredential`] - a fixed value supplied by the embedder

use async_trait::async_trait;
use keyring::Entry;
use promptprobe_core::ApiKey;
use tracing::{debug, warn};

use crate::error::CredentialError;

/// Service name prefix for promptprobe keychain entries.
const SERVICE_PREFIX: &str = "promptprobe";

/// Keychain account holding API keys.
pub const API_KEY_ACCOUNT: &str = "api_key";

/// Default credential name.
pub const DEFAULT_CREDENTIAL_NAME: &str = "GEMINI_API_KEY";

// ============================================================================
// Credential Source Trait
// ============================================================================

/// A source that yields one secret by name.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Looks up the secret called `name`.
    ///
    /// # Errors
    /// * [`CredentialError::NotFound`] - no such secret
    /// * [`CredentialError::Empty`] - the secret is empty or whitespace
    async fn get_secret(&self, name: &str) -> Result<ApiKey, CredentialError>;
}

/// Rejects blank secrets.
fn non_blank(name: &str, secret: String) -> Result<ApiKey, CredentialError> {
    let key = ApiKey::new(secret);
    if key.is_blank() {
        return Err(CredentialError::Empty(name.to_string()));
    }
    Ok(key)
}

// ============================================================================
// Environment
// ============================================================================

/// Reads the secret from the environment variable called `name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Creates a new environment credential source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialSource for EnvCredentials {
    async fn get_secret(&self, name: &str) -> Result<ApiKey, CredentialError> {
        debug!(name = %name, "Reading credential from environment");

        match std::env::var(name) {
            Ok(value) => non_blank(name, value),
            Err(std::env::VarError::NotPresent) => Err(CredentialError::NotFound(name.to_string())),
            Err(std::env::VarError::NotUnicode(_)) => Err(CredentialError::Other(format!(
                "{name} is not valid unicode"
            ))),
        }
    }
}

// ============================================================================
// System Keychain
// ============================================================================

/// Reads the secret from the system keychain.
///
/// Entries live under service `promptprobe:<name>`, account `api_key`.
#[derive(Debug, Clone, Default)]
pub struct SystemKeychain;

impl SystemKeychain {
    /// Creates a new system keychain instance.
    pub fn new() -> Self {
        Self
    }

    /// Builds the full service name with prefix.
    fn full_service(name: &str) -> String {
        format!("{SERVICE_PREFIX}:{name}")
    }

    /// Creates a keyring entry.
    fn entry(name: &str) -> Result<Entry, CredentialError> {
        Entry::new(&Self::full_service(name), API_KEY_ACCOUNT)
            .map_err(|e| CredentialError::Platform(e.to_string()))
    }
}

#[async_trait]
impl CredentialSource for SystemKeychain {
    async fn get_secret(&self, name: &str) -> Result<ApiKey, CredentialError> {
        debug!(name = %name, "Getting credential from keychain");

        let entry = Self::entry(name)?;

        match entry.get_password() {
            Ok(secret) => non_blank(name, secret),
            Err(keyring::Error::NoEntry) => {
                debug!(name = %name, "Credential not found");
                Err(CredentialError::NotFound(name.to_string()))
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Failed to get credential");
                Err(e.into())
            }
        }
    }
}

// ============================================================================
// Static
// ============================================================================

/// A fixed secret, independent of the requested name.
#[derive(Debug, Clone)]
pub struct StaticCredential(ApiKey);

impl StaticCredential {
    /// Wraps a fixed secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(ApiKey::new(secret))
    }
}

#[async_trait]
impl CredentialSource for StaticCredential {
    async fn get_secret(&self, name: &str) -> Result<ApiKey, CredentialError> {
        non_blank(name, self.0.expose().to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_service_name() {
        assert_eq!(
            SystemKeychain::full_service("GEMINI_API_KEY"),
            "promptprobe:GEMINI_API_KEY"
        );
    }

    #[tokio::test]
    async fn test_missing_env_var_is_not_found() {
        let result = EnvCredentials::new()
            .get_secret("PROMPTPROBE_TEST_UNSET_VARIABLE_3F9A")
            .await;
        assert!(matches!(result, Err(CredentialError::NotFound(name)) if name == "PROMPTPROBE_TEST_UNSET_VARIABLE_3F9A"));
    }

    #[tokio::test]
    async fn test_static_credential() {
        let key = StaticCredential::new("abc123").get_secret("any").await.unwrap();
        assert_eq!(key.expose(), "abc123");
    }

    #[tokio::test]
    async fn test_blank_static_credential_is_empty() {
        let result = StaticCredential::new("  ").get_secret("GEMINI_API_KEY").await;
        assert!(matches!(result, Err(CredentialError::Empty(name)) if name == "GEMINI_API_KEY"));
    }

    // Keychain lookups need platform access and are not exercised here.
}
