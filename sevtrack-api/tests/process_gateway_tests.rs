//! Process gateway tests against real child processes
//!
//! Classifier scripts are small shell scripts run through `sh`, standing in
//! for the Python models used in production.

#![cfg(unix)]

use sevtrack_api::classifier::{ClassifierError, ClassifierGateway, ProcessGateway, SeverityClassifier};
use sevtrack_common::BugReport;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

fn script(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", body).unwrap();
    file.flush().unwrap();
    file
}

fn sh() -> ProcessGateway {
    ProcessGateway::new("sh")
}

#[tokio::test]
async fn test_stdout_is_trimmed() {
    let script = script(r#"printf '  \n High \n\n'"#);

    let output = sh().classify(script.path(), &[]).await.unwrap();

    assert_eq!(output, "High");
}

#[tokio::test]
async fn test_arguments_passed_in_order() {
    let script = script(r#"echo "$1|$2""#);

    let output = sh()
        .classify(script.path(), &["Crash on save".to_string(), "Editor exits".to_string()])
        .await
        .unwrap();

    assert_eq!(output, "Crash on save|Editor exits");
}

#[tokio::test]
async fn test_multiple_stdout_chunks_concatenated() {
    let script = script("printf 'Hi'\nsleep 0.1\nprintf 'gh'");

    let output = sh().classify(script.path(), &[]).await.unwrap();

    assert_eq!(output, "High");
}

#[tokio::test]
async fn test_any_stderr_output_fails_even_on_success_exit() {
    let script = script("echo High\necho 'UserWarning: deprecated' >&2\nexit 0");

    let result = sh().classify(script.path(), &[]).await;

    match result {
        Err(ClassifierError::Stderr(text)) => assert!(text.contains("UserWarning")),
        other => panic!("Expected stderr failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_nonzero_exit_without_stderr_succeeds() {
    let script = script("echo Low\nexit 3");

    let output = sh().classify(script.path(), &[]).await.unwrap();

    assert_eq!(output, "Low");
}

#[tokio::test]
async fn test_empty_output_succeeds() {
    let script = script("exit 0");

    let output = sh().classify(script.path(), &[]).await.unwrap();

    assert_eq!(output, "");
}

#[tokio::test]
async fn test_missing_interpreter_is_spawn_error() {
    let gateway = ProcessGateway::new("/nonexistent/interpreter-for-sevtrack-tests");

    let result = gateway.classify(Path::new("model.py"), &[]).await;

    assert!(matches!(result, Err(ClassifierError::Spawn(_))));
}

#[tokio::test]
async fn test_timeout_kills_slow_classifier() {
    let script = script("sleep 5\necho High");
    let gateway = sh().with_timeout(Some(Duration::from_millis(200)));

    let started = Instant::now();
    let result = gateway.classify(script.path(), &[]).await;

    assert!(matches!(result, Err(ClassifierError::Timeout(_))));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_batch_round_trip_through_process() {
    // Echo one label per input pair by counting the pairs in the JSON argument
    let batch = script(r#"case "$1" in *'],['*) echo '["High", "Low"]' ;; *) echo '["High"]' ;; esac"#);
    let classifier = SeverityClassifier::new(Arc::new(sh()), "unused.py", batch.path());

    let labels = classifier
        .classify_batch(&[
            [Some("a".to_string()), Some("1".to_string())],
            [Some("b".to_string()), Some("2".to_string())],
        ])
        .await
        .unwrap();

    assert_eq!(labels, vec![Some("High".to_string()), Some("Low".to_string())]);
}

#[tokio::test]
async fn test_single_through_process() {
    let single = script(r#"if [ "$1" = "Crash" ]; then echo Critical; else echo Minor; fi"#);
    let classifier = SeverityClassifier::new(Arc::new(sh()), single.path(), "unused.py");

    let label = classifier
        .classify_one(&BugReport::new("Crash", "Editor exits"))
        .await
        .unwrap();

    assert_eq!(label, "Critical");
}
