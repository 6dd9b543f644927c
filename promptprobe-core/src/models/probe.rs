//! Probe request, answer, and attempt records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::candidate::Candidate;

// ============================================================================
// Probe Request
// ============================================================================

/// A free-text question to send upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    /// The question text.
    pub question: String,
}

impl ProbeRequest {
    /// Creates a new request.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    /// Returns true if the question is empty or whitespace-only.
    ///
    /// Callers are expected to reject blank questions before probing.
    pub fn is_blank(&self) -> bool {
        self.question.trim().is_empty()
    }

    /// Builds the prompt text sent upstream.
    pub fn prompt(&self, preamble: Option<&str>) -> String {
        match preamble.map(str::trim).filter(|p| !p.is_empty()) {
            Some(preamble) => format!("{preamble}\n\nQuestion: {}", self.question),
            None => self.question.clone(),
        }
    }
}

impl From<&str> for ProbeRequest {
    fn from(question: &str) -> Self {
        Self::new(question)
    }
}

// ============================================================================
// Answer
// ============================================================================

/// A successful probe result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text (never blank).
    pub text: String,
    /// The candidate that produced it.
    pub candidate: Candidate,
}

// ============================================================================
// Attempt Records
// ============================================================================

/// Record of a single candidate attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeAttempt {
    /// The candidate that was attempted.
    pub candidate: Candidate,
    /// Whether the attempt produced an answer.
    pub success: bool,
    /// Error message if the attempt failed.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
    /// When the attempt started.
    pub started_at: DateTime<Utc>,
}

impl ProbeAttempt {
    /// Creates a successful attempt record.
    pub fn success(candidate: Candidate, started_at: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            candidate,
            success: true,
            error: None,
            duration,
            started_at,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(
        candidate: Candidate,
        error: impl Into<String>,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            candidate,
            success: false,
            error: Some(error.into()),
            duration,
            started_at,
        }
    }

    /// Converts a failed attempt into its failure detail.
    pub fn as_failure(&self) -> Option<AttemptFailure> {
        self.error.as_ref().map(|message| AttemptFailure {
            candidate: self.candidate.clone(),
            message: message.clone(),
        })
    }
}

/// A candidate paired with the error it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptFailure {
    /// The candidate that failed.
    pub candidate: Candidate,
    /// Human-readable error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::EndpointTemplate;

    #[test]
    fn test_blank_question() {
        assert!(ProbeRequest::new("").is_blank());
        assert!(ProbeRequest::new(" \n\t").is_blank());
        assert!(!ProbeRequest::new("2 + 2?").is_blank());
    }

    #[test]
    fn test_prompt_with_preamble() {
        let request = ProbeRequest::new("What is 2 + 2?");
        assert_eq!(
            request.prompt(Some("You are a tutor.")),
            "You are a tutor.\n\nQuestion: What is 2 + 2?"
        );
    }

    #[test]
    fn test_prompt_without_preamble() {
        let request = ProbeRequest::new("What is 2 + 2?");
        assert_eq!(request.prompt(None), "What is 2 + 2?");
        assert_eq!(request.prompt(Some("   ")), "What is 2 + 2?");
    }

    #[test]
    fn test_failure_detail_only_for_failed_attempts() {
        let candidate = Candidate::new(EndpointTemplate::from("u/{model}?k={key}"), "m");
        let ok = ProbeAttempt::success(candidate.clone(), Utc::now(), Duration::ZERO);
        let failed = ProbeAttempt::failure(candidate.clone(), "m: boom", Utc::now(), Duration::ZERO);

        assert!(ok.as_failure().is_none());
        assert_eq!(
            failed.as_failure(),
            Some(AttemptFailure {
                candidate,
                message: "m: boom".to_string()
            })
        );
    }
}
