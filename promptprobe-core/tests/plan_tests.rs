//! Integration tests for candidate plans.

use promptprobe_core::{ApiKey, CandidatePlan, CoreError, EndpointTemplate};

fn plan() -> CandidatePlan {
    CandidatePlan::try_new(
        vec![
            EndpointTemplate::parse("https://a.test/v1beta/models/{model}:generateContent?key={key}").unwrap(),
            EndpointTemplate::parse("https://a.test/v1/models/{model}:generateContent?key={key}").unwrap(),
        ],
        vec!["fast".into(), "pro".into()],
    )
    .unwrap()
}

#[test]
fn test_templates_are_the_outer_loop() {
    let order: Vec<String> = plan()
        .candidates()
        .map(|c| format!("{}@{}", c.model, if c.template.as_str().contains("v1beta") { "beta" } else { "v1" }))
        .collect();

    assert_eq!(order, vec!["fast@beta", "pro@beta", "fast@v1", "pro@v1"]);
}

#[test]
fn test_rendered_url_carries_key_only_when_asked() {
    let key = ApiKey::new("AIzaSecret123");
    let first = plan().candidates().next().unwrap();

    assert_eq!(
        first.url(&key),
        "https://a.test/v1beta/models/fast:generateContent?key=AIzaSecret123"
    );
    assert!(!first.redacted_url().contains("AIzaSecret123"));
    assert!(!first.to_string().contains("AIzaSecret123"));
}

#[test]
fn test_invalid_inputs_are_rejected() {
    assert!(matches!(
        EndpointTemplate::parse("https://a.test/models/{model}"),
        Err(CoreError::InvalidTemplate { placeholder: "{key}", .. })
    ));
    assert!(matches!(
        CandidatePlan::try_new(vec![EndpointTemplate::from("x/{model}?k={key}")], vec![" ".into()]),
        Err(CoreError::BlankModel)
    ));
}
