//! Serde tests for core types.
//!
//! These cover the shapes that appear in configuration files and JSON
//! output, including partially specified input.

use crate::{Candidate, CandidatePlan, EndpointTemplate, GenerationParams};

#[test]
fn test_endpoint_template_is_a_plain_string() {
    let template = EndpointTemplate::from("https://host/{model}?key={key}");
    let json = serde_json::to_string(&template).unwrap();
    assert_eq!(json, r#""https://host/{model}?key={key}""#);
}

#[test]
fn test_generation_params_fill_missing_fields() {
    let params: GenerationParams = serde_json::from_str(r#"{"temperature": 0.2}"#).unwrap();
    assert!((params.temperature - 0.2).abs() < f64::EPSILON);
    assert_eq!(params.max_output_tokens, 2000);
    assert_eq!(params.top_k, 40);
}

#[test]
fn test_plan_deserializes_in_order() {
    let json = r#"{
        "templates": ["A/{model}?{key}", "B/{model}?{key}"],
        "models": ["fast", "slow"]
    }"#;
    let plan: CandidatePlan = serde_json::from_str(json).unwrap();
    let models: Vec<String> = plan.candidates().map(|c| c.model).collect();
    assert_eq!(models, vec!["fast", "slow", "fast", "slow"]);
}

#[test]
fn test_candidate_serializes_template_and_model() {
    let candidate = Candidate::new(EndpointTemplate::from("A/{model}?{key}"), "fast");
    let value = serde_json::to_value(&candidate).unwrap();
    assert_eq!(value["template"], "A/{model}?{key}");
    assert_eq!(value["model"], "fast");
}
