//! Integration tests for intent routing.

use pilot_router::{rules, AgentCategory, IntentRouter, RouterConfig};

/// One keyword per category routes to that category.
#[test]
fn test_each_category_keyword() {
    let router = IntentRouter::new();

    let cases = [
        ("clean the data", AgentCategory::Preprocessing),
        ("remove duplicate rows", AgentCategory::Preprocessing),
        ("encode the country column", AgentCategory::Preprocessing),
        ("analyze sales", AgentCategory::Exploration),
        ("analyse the distribution", AgentCategory::Exploration),
        ("run some EDA", AgentCategory::Exploration),
        ("predict churn", AgentCategory::Modeling),
        ("what's the AUC", AgentCategory::Modeling),
        ("show feature importance", AgentCategory::Modeling),
        ("give me a business summary", AgentCategory::Insight),
        ("what are the key factors", AgentCategory::Insight),
    ];

    for (text, expected) in cases {
        let decision = router.route(text);
        assert_eq!(decision.category, expected, "routing '{}'", text);
        assert!(!decision.is_default(), "'{}' should match a rule", text);
    }
}

/// Text without keywords takes the default route.
#[test]
fn test_no_keywords_routes_to_default() {
    let router = IntentRouter::new();
    let decision = router.route("good morning, how are you?");

    assert_eq!(decision.category, AgentCategory::Exploration);
    assert_eq!(decision.status_line, rules::DEFAULT_STATUS);
    assert_ne!(decision.status_line, rules::EXPLORATION_STATUS);
}

/// Lower-numbered rules win when several categories match.
#[test]
fn test_priority_tie_breaks() {
    let router = IntentRouter::new();

    assert_eq!(
        router.route("explain the trend").category,
        AgentCategory::Exploration
    );
    assert_eq!(
        router.route("predict churn then explain it").category,
        AgentCategory::Modeling
    );
    assert_eq!(
        router.route("remove nulls before training").category,
        AgentCategory::Preprocessing
    );
}

/// The same text always yields the same decision.
#[test]
fn test_routing_is_deterministic() {
    let router = IntentRouter::new();
    let first = router.route("Train a MODEL for accuracy");
    for _ in 0..10 {
        assert_eq!(router.route("Train a MODEL for accuracy"), first);
    }
    assert_eq!(first.category, AgentCategory::Modeling);
    assert_eq!(first.status_line, rules::MODELING_STATUS);
}

/// Custom rules from YAML replace the built-in set.
#[test]
fn test_router_from_yaml_config() {
    let yaml = r#"
rules:
  - pattern: "\\bforecast(ing)?\\b"
    category: modeling
    statusLine: "Forecasting goes to the Data Scientist."
  - pattern: "dashboard"
    category: insight
    status_line: "Dashboards go to the Insight Agent."
default_status_line: "Nothing matched."
"#;
    let config = RouterConfig::from_yaml_str(yaml).unwrap();
    let router = IntentRouter::from_config(&config).unwrap();

    assert_eq!(router.rules().len(), 2);
    assert_eq!(router.route("Forecasting Q3").category, AgentCategory::Modeling);
    assert_eq!(router.route("build a dashboard").category, AgentCategory::Insight);

    // Built-in vocabulary no longer applies.
    let fallback = router.route("clean the data");
    assert!(fallback.is_default());
    assert_eq!(fallback.status_line, "Nothing matched.");
}

#[test]
fn test_invalid_custom_rule_is_rejected() {
    let yaml = r#"
rules:
  - pattern: "[unterminated"
    category: insight
    status_line: "broken"
"#;
    let config = RouterConfig::from_yaml_str(yaml).unwrap();
    assert!(IntentRouter::from_config(&config).is_err());
}

#[test]
fn test_decision_serializes_camel_case() {
    let decision = IntentRouter::new().route("summary please");
    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["category"], "insight");
    assert_eq!(json["matchedRule"], 3);
    assert!(json["statusLine"].as_str().unwrap().contains("Insight Agent"));
}
