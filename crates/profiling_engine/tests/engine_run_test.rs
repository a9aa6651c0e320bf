//! End-to-end runs over realistic record streams.

use pretty_assertions::assert_eq;
use profiling_core::{FailureReport, Rule, RuleBuilder};
use profiling_engine::{
    CancellationToken, CollectingSink, DimensionRegistry, EngineConfig, JsonLinesSource,
    MemorySource, ProfilingEngine, UnknownDimensionPolicy,
};
use std::io::Write;
use std::sync::Arc;

fn person_rules() -> Vec<Rule> {
    vec![
        RuleBuilder::completeness("name"),
        RuleBuilder::name_validity("name"),
        RuleBuilder::age_validity("age"),
        RuleBuilder::gender_validity("gender"),
        RuleBuilder::bmi_validity("body.weight", "body.height", "body.bmi"),
    ]
}

fn engine_with(rules: Vec<Rule>, config: EngineConfig) -> (ProfilingEngine, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::new());
    let engine = ProfilingEngine::with_config(
        rules,
        DimensionRegistry::with_defaults(),
        sink.clone(),
        config,
    );
    (engine, sink)
}

fn sorted(mut reports: Vec<FailureReport>) -> Vec<FailureReport> {
    reports.sort_by(|a, b| a.message.cmp(&b.message));
    reports
}

const VALID: &str =
    r#"{"name": "John", "age": 30, "gender": "M", "body": {"weight": 80, "height": 1.8, "bmi": 24.7}}"#;

#[tokio::test]
async fn test_reports_only_failing_records() {
    let bad_name = r#"{"name": "John3", "age": 30, "gender": "M", "body": {"weight": 80, "height": 1.8, "bmi": 24.7}}"#;
    let bad_bmi = r#"{"name": "Jane", "age": 28, "gender": "F", "body": {"weight": 80, "height": 1.8, "bmi": 24.6}}"#;
    let many = r#"{"name": "", "age": -4, "gender": "X", "body": {"weight": 0, "height": 1.8, "bmi": 0}}"#;

    let mut queue = vec![VALID; 7];
    queue.extend([bad_name, bad_bmi, many]);
    let source = MemorySource::new().with_queue("people", queue);

    let (engine, sink) = engine_with(person_rules(), EngineConfig::default());
    let stats = engine
        .run_source(&source, "people", &CancellationToken::new())
        .await;

    assert_eq!(stats.records_received, 10);
    assert_eq!(stats.records_dispatched, 10);
    assert_eq!(stats.records_completed, 10);
    assert_eq!(stats.reports_emitted, 3);

    let reports = sorted(sink.reports());
    assert_eq!(
        reports,
        sorted(vec![
            FailureReport {
                message: bad_name.to_string(),
                failures: vec!["evaluation error: name has invalid characters".to_string()],
            },
            FailureReport {
                message: bad_bmi.to_string(),
                failures: vec![
                    "evaluation error: body.bmi value 24.6 is not equal to weight / (height * height) = 24.7"
                        .to_string()
                ],
            },
            FailureReport {
                message: many.to_string(),
                failures: vec![
                    "evaluation error: name value is empty".to_string(),
                    "evaluation error: age value is negative".to_string(),
                    "evaluation error: gender value 'X' is not one of [M, F]".to_string(),
                    "evaluation error: body.weight value is not positive".to_string(),
                ],
            },
        ])
    );
}

#[tokio::test]
async fn test_json_lines_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("people.jsonl")).unwrap();
    for i in 0..25 {
        if i % 5 == 0 {
            writeln!(file, r#"{{"name": "Bob", "age": -{}}}"#, i + 1).unwrap();
        } else {
            writeln!(file, r#"{{"name": "Bob", "age": {}}}"#, i).unwrap();
        }
        if i % 10 == 0 {
            writeln!(file).unwrap();
        }
    }
    drop(file);

    let rules = vec![
        RuleBuilder::name_validity("name"),
        RuleBuilder::age_validity("age"),
    ];
    let (engine, sink) = engine_with(rules, EngineConfig::new().with_concurrency(4));
    let source = JsonLinesSource::new(dir.path());

    let stats = engine
        .run_source(&source, "people.jsonl", &CancellationToken::new())
        .await;

    assert_eq!(stats.records_received, 25);
    assert_eq!(stats.records_dispatched, 25);
    assert_eq!(stats.reports_emitted, 5);
    assert_eq!(stats.source_errors, 0);
    assert!(
        sink.reports()
            .iter()
            .all(|report| report.failures == vec!["evaluation error: age value is negative"])
    );
}

#[tokio::test]
async fn test_missing_file_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, sink) = engine_with(person_rules(), EngineConfig::default());

    let stats = engine
        .run_source(
            &JsonLinesSource::new(dir.path()),
            "absent.jsonl",
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(stats.records_received, 1);
    assert_eq!(stats.source_errors, 1);
    assert_eq!(stats.records_dispatched, 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_unknown_dimension_policies() {
    let mut rules = person_rules();
    rules.insert(0, RuleBuilder::new("Freshness").field("ts", "updated_at").build());
    let source = MemorySource::new().with_queue("people", [VALID, VALID]);

    let (skipping, skipped) = engine_with(rules.clone(), EngineConfig::default());
    let stats = skipping
        .run_source(&source, "people", &CancellationToken::new())
        .await;
    assert_eq!(stats.reports_emitted, 0);
    assert!(skipped.is_empty());

    let (failing, failed) = engine_with(
        rules,
        EngineConfig::default().with_unknown_dimensions(UnknownDimensionPolicy::Fail),
    );
    let stats = failing
        .run_source(&source, "people", &CancellationToken::new())
        .await;
    assert_eq!(stats.reports_emitted, 2);
    for report in failed.reports() {
        assert_eq!(
            report.failures,
            vec!["config error: unknown dimension 'Freshness'"]
        );
    }
}

#[tokio::test]
async fn test_wrong_type_and_missing_are_distinct() {
    let (engine, _) = engine_with(
        vec![RuleBuilder::gender_validity("gender")],
        EngineConfig::default(),
    );

    let wrong_type = engine.process(br#"{"gender": 1}"#).unwrap();
    let missing = engine.process(br#"{"sex": "M"}"#).unwrap();

    assert_eq!(
        wrong_type.failures,
        vec!["config error: field 'gender' for 'gender' is not a string (found number)"]
    );
    assert_eq!(
        missing.failures,
        vec!["config error: field 'gender' for 'gender' is missing"]
    );
}
