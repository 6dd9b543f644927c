//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use promptprobe_core::{AttemptFailure, CandidatePlan};
use promptprobe_fetch::ProbeOutcome;
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the ask command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskOutput {
    pub question: String,
    pub answer: Option<String>,
    pub model: Option<String>,
    pub attempts: usize,
    pub duration_ms: u64,
    #[serde(serialize_with = "serialize_datetime")]
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureOutput>,
}

/// A failed candidate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureOutput {
    pub model: String,
    pub url: String,
    pub message: String,
}

/// JSON output for the models command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsOutput {
    pub count: usize,
    pub models: Vec<String>,
}

/// One entry of the candidate order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntryOutput {
    pub position: usize,
    pub model: String,
    pub url: String,
}

/// JSON output for the check command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub credential: String,
    pub credential_loaded: bool,
    pub reachable: bool,
    pub models: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

impl From<&AttemptFailure> for FailureOutput {
    fn from(failure: &AttemptFailure) -> Self {
        Self {
            model: failure.candidate.model.clone(),
            url: failure.candidate.redacted_url(),
            message: failure.message.clone(),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the outcome of a probe.
    pub fn format_answer(&self, question: &str, outcome: &ProbeOutcome) -> Result<String> {
        self.format(&ask_output(question, outcome, Utc::now()))
    }

    /// Formats a model list.
    pub fn format_models(&self, models: &[String]) -> Result<String> {
        self.format(&ModelsOutput {
            count: models.len(),
            models: models.to_vec(),
        })
    }

    /// Formats the candidate order with redacted URLs.
    pub fn format_plan(&self, plan: &CandidatePlan) -> Result<String> {
        self.format(&plan_output(plan))
    }
}

/// Builds the ask output from a probe outcome.
pub fn ask_output(question: &str, outcome: &ProbeOutcome, timestamp: DateTime<Utc>) -> AskOutput {
    let (answer, model, error, failures) = match &outcome.result {
        Ok(answer) => (
            Some(answer.text.clone()),
            Some(answer.candidate.model.clone()),
            None,
            Vec::new(),
        ),
        Err(e) => (
            None,
            None,
            Some(e.to_string()),
            e.failures().iter().map(FailureOutput::from).collect(),
        ),
    };

    AskOutput {
        question: question.to_string(),
        answer,
        model,
        attempts: outcome.attempts_count(),
        duration_ms: u64::try_from(outcome.duration.as_millis()).unwrap_or(u64::MAX),
        timestamp,
        success: outcome.is_success(),
        error,
        failures,
    }
}

/// Builds the plan output.
pub fn plan_output(plan: &CandidatePlan) -> Vec<PlanEntryOutput> {
    plan.candidates()
        .enumerate()
        .map(|(i, candidate)| PlanEntryOutput {
            position: i + 1,
            url: candidate.redacted_url(),
            model: candidate.model,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_format_models() {
        let formatter = JsonFormatter::new(false);
        let output = formatter
            .format_models(&["gemini-2.5-flash".to_string()])
            .unwrap();
        assert_eq!(output, r#"{"count":1,"models":["gemini-2.5-flash"]}"#);
    }
}
