//! Endpoint templates, candidates, and the ordered candidate plan.
//!
//! A candidate is one `(endpoint template, model name)` pair. The plan owns
//! the configured templates and models and yields candidates in a fixed
//! order: templates form the outer loop, models the inner loop.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::models::credential::ApiKey;

/// Placeholder substituted with the model name.
pub const MODEL_PLACEHOLDER: &str = "{model}";

/// Placeholder substituted with the API key.
pub const KEY_PLACEHOLDER: &str = "{key}";

/// Replacement shown in place of the API key in logs and output.
const REDACTED_KEY: &str = "***";

// ============================================================================
// Endpoint Template
// ============================================================================

/// A URL template containing `{model}` and `{key}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointTemplate(String);

impl EndpointTemplate {
    /// Creates a template without validating it.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Creates a template, requiring both placeholders.
    pub fn parse(template: impl Into<String>) -> Result<Self, CoreError> {
        let template = Self(template.into());
        template.validate()?;
        Ok(template)
    }

    /// Checks that both placeholders are present.
    pub fn validate(&self) -> Result<(), CoreError> {
        for placeholder in [MODEL_PLACEHOLDER, KEY_PLACEHOLDER] {
            if !self.0.contains(placeholder) {
                return Err(CoreError::InvalidTemplate {
                    template: self.0.clone(),
                    placeholder,
                });
            }
        }
        Ok(())
    }

    /// Returns the raw template string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes the model name and key into the template.
    pub fn render(&self, model: &str, key: &ApiKey) -> String {
        self.fill(model, key.expose())
    }

    /// Substitutes the model name and a redacted key, safe for logging.
    pub fn redacted(&self, model: &str) -> String {
        self.fill(model, REDACTED_KEY)
    }

    fn fill(&self, model: &str, key: &str) -> String {
        self.0
            .replace(MODEL_PLACEHOLDER, model)
            .replace(KEY_PLACEHOLDER, key)
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EndpointTemplate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// Candidate
// ============================================================================

/// One `(endpoint template, model name)` pair attempted during a probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// The endpoint template.
    pub template: EndpointTemplate,
    /// The model name substituted into the template.
    pub model: String,
}

impl Candidate {
    /// Creates a new candidate.
    pub fn new(template: EndpointTemplate, model: impl Into<String>) -> Self {
        Self {
            template,
            model: model.into(),
        }
    }

    /// Renders the full request URL, including the key.
    pub fn url(&self, key: &ApiKey) -> String {
        self.template.render(&self.model, key)
    }

    /// Renders the request URL with the key redacted.
    pub fn redacted_url(&self) -> String {
        self.template.redacted(&self.model)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.model, self.redacted_url())
    }
}

// ============================================================================
// Candidate Plan
// ============================================================================

/// The ordered set of templates and models a probe walks through.
///
/// Order is significant: earlier templates and models are preferred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePlan {
    templates: Vec<EndpointTemplate>,
    models: Vec<String>,
}

impl CandidatePlan {
    /// Creates a plan from templates and models without validation.
    pub fn new(templates: Vec<EndpointTemplate>, models: Vec<String>) -> Self {
        Self { templates, models }
    }

    /// Creates a plan, validating every template and model name.
    pub fn try_new(templates: Vec<EndpointTemplate>, models: Vec<String>) -> Result<Self, CoreError> {
        let plan = Self::new(templates, models);
        plan.validate()?;
        Ok(plan)
    }

    /// Validates templates and model names.
    pub fn validate(&self) -> Result<(), CoreError> {
        for template in &self.templates {
            template.validate()?;
        }
        if self.models.iter().any(|m| m.trim().is_empty()) {
            return Err(CoreError::BlankModel);
        }
        Ok(())
    }

    /// Returns the configured templates.
    pub fn templates(&self) -> &[EndpointTemplate] {
        &self.templates
    }

    /// Returns the configured models.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Total number of candidates (`templates × models`).
    pub fn len(&self) -> usize {
        self.templates.len() * self.models.len()
    }

    /// Returns true if the plan yields no candidates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates candidates: outer loop over templates, inner over models.
    pub fn candidates(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.templates.iter().flat_map(move |template| {
            self.models
                .iter()
                .map(move |model| Candidate::new(template.clone(), model.clone()))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(templates: &[&str], models: &[&str]) -> CandidatePlan {
        CandidatePlan::new(
            templates.iter().map(|t| EndpointTemplate::from(*t)).collect(),
            models.iter().map(|m| (*m).to_string()).collect(),
        )
    }

    #[test]
    fn test_candidate_order_is_template_then_model() {
        let plan = plan(&["T1/{model}?{key}", "T2/{model}?{key}"], &["M1", "M2"]);
        let order: Vec<(String, String)> = plan
            .candidates()
            .map(|c| (c.template.as_str().to_string(), c.model))
            .collect();

        assert_eq!(
            order,
            vec![
                ("T1/{model}?{key}".to_string(), "M1".to_string()),
                ("T1/{model}?{key}".to_string(), "M2".to_string()),
                ("T2/{model}?{key}".to_string(), "M1".to_string()),
                ("T2/{model}?{key}".to_string(), "M2".to_string()),
            ]
        );
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn test_empty_models_yield_no_candidates() {
        let plan = plan(&["T1/{model}?{key}"], &[]);
        assert!(plan.is_empty());
        assert_eq!(plan.candidates().count(), 0);
    }

    #[test]
    fn test_render_substitutes_every_placeholder() {
        let template = EndpointTemplate::from("https://host/{model}:go?key={key}&m={model}");
        let key = ApiKey::new("secret");
        assert_eq!(
            template.render("flash", &key),
            "https://host/flash:go?key=secret&m=flash"
        );
    }

    #[test]
    fn test_redacted_url_hides_key() {
        let candidate = Candidate::new(EndpointTemplate::from("https://host/{model}?key={key}"), "pro");
        let shown = candidate.to_string();
        assert_eq!(shown, "pro via https://host/pro?key=***");
    }

    #[test]
    fn test_template_validation() {
        assert!(EndpointTemplate::parse("https://host/{model}?key={key}").is_ok());
        assert!(matches!(
            EndpointTemplate::parse("https://host/fixed?key={key}"),
            Err(CoreError::InvalidTemplate { placeholder: MODEL_PLACEHOLDER, .. })
        ));
        assert!(matches!(
            EndpointTemplate::parse("https://host/{model}"),
            Err(CoreError::InvalidTemplate { placeholder: KEY_PLACEHOLDER, .. })
        ));
    }

    #[test]
    fn test_blank_model_rejected() {
        let result = CandidatePlan::try_new(
            vec![EndpointTemplate::from("https://host/{model}?key={key}")],
            vec!["flash".to_string(), "  ".to_string()],
        );
        assert!(matches!(result, Err(CoreError::BlankModel)));
    }
}
