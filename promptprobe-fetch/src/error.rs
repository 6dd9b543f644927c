//! Fetch error types.

use std::fmt::Write as _;
use std::time::Duration;

use promptprobe_core::AttemptFailure;
use thiserror::Error;

// ============================================================================
// Probe Error
// ============================================================================

/// Terminal error of a probe.
///
/// Per-candidate errors never surface on their own; they are collected into
/// [`ProbeError::UpstreamExhausted`] or [`ProbeError::DeadlineExceeded`].
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Every candidate was tried and none produced an answer.
    #[error("All {} candidates failed", .failures.len())]
    UpstreamExhausted {
        /// Per-candidate errors, in attempt order.
        failures: Vec<AttemptFailure>,
    },

    /// The outer probe deadline expired before an answer was found.
    #[error("Probe deadline of {deadline:?} exceeded after {} failed attempts", .failures.len())]
    DeadlineExceeded {
        /// The configured deadline.
        deadline: Duration,
        /// Per-candidate errors recorded before the deadline, in order.
        failures: Vec<AttemptFailure>,
    },

    /// The candidate plan is empty.
    #[error("No candidates configured")]
    NoCandidates,

    /// The credential could not be loaded.
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// The HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    Http(#[from] HttpError),
}

impl ProbeError {
    /// Per-candidate failure detail, empty for configuration errors.
    pub fn failures(&self) -> &[AttemptFailure] {
        match self {
            Self::UpstreamExhausted { failures } | Self::DeadlineExceeded { failures, .. } => {
                failures
            }
            _ => &[],
        }
    }

    /// The error message followed by one line per failed candidate.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        for failure in self.failures() {
            let _ = write!(out, "\n  - {}: {}", failure.candidate, failure.message);
        }
        out
    }
}

// ============================================================================
// Attempt Error
// ============================================================================

/// Error of a single candidate attempt.
///
/// All variants are handled the same way by the prober: logged, recorded,
/// and the loop moves on to the next candidate.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Network failure or per-call timeout.
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),

    /// Upstream answered with a non-success status.
    #[error("{model}: {message}")]
    UpstreamRejected {
        /// Model (or operation) the request was for.
        model: String,
        /// HTTP status code.
        status: u16,
        /// Message from the error envelope, or one synthesized from the status.
        message: String,
    },

    /// Success status, but the body did not contain a usable answer.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

// ============================================================================
// Credential Error
// ============================================================================

/// Error type for credential lookups.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Credential not found.
    #[error("Credential not found: {0}")]
    NotFound(String),

    /// Credential present but empty.
    #[error("Credential is empty: {0}")]
    Empty(String),

    /// Access denied.
    #[error("Access denied to keychain")]
    AccessDenied,

    /// Platform error.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Generic error.
    #[error("Credential error: {0}")]
    Other(String),
}

impl From<keyring::Error> for CredentialError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoEntry => CredentialError::NotFound(String::new()),
            keyring::Error::Ambiguous(_) => {
                CredentialError::Other("Ambiguous credential entry".to_string())
            }
            keyring::Error::PlatformFailure(e) => CredentialError::Platform(e.to_string()),
            keyring::Error::NoStorageAccess(_) => CredentialError::AccessDenied,
            _ => CredentialError::Other(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptprobe_core::{Candidate, EndpointTemplate};

    #[test]
    fn test_rejected_message_is_model_prefixed() {
        let error = AttemptError::UpstreamRejected {
            model: "gemini-2.5-pro".to_string(),
            status: 400,
            message: "API key not valid".to_string(),
        };
        assert_eq!(error.to_string(), "gemini-2.5-pro: API key not valid");
    }

    #[test]
    fn test_detail_lists_failures() {
        let candidate = Candidate::new(EndpointTemplate::from("https://h/{model}?key={key}"), "m1");
        let error = ProbeError::UpstreamExhausted {
            failures: vec![AttemptFailure {
                candidate,
                message: "m1: quota".to_string(),
            }],
        };
        assert_eq!(
            error.detail(),
            "All 1 candidates failed\n  - m1 via https://h/m1?key=***: m1: quota"
        );
    }

    #[test]
    fn test_configuration_errors_have_no_failures() {
        assert!(ProbeError::NoCandidates.failures().is_empty());
    }
}
