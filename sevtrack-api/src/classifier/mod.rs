//! Severity classification through an external classifier
//!
//! Two layers:
//! - [`ClassifierGateway`]: raw `classify(script, args) -> stdout` boundary.
//!   [`ProcessGateway`] spawns one process per call; tests and alternative
//!   deployments plug in their own implementation.
//! - [`SeverityClassifier`]: encodes reports into script arguments and decodes
//!   the script output into severity labels.

use async_trait::async_trait;
use serde_json::Value;
use sevtrack_common::config::ClassifierConfig;
use sevtrack_common::BugReport;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub mod process;

pub use process::ProcessGateway;

/// Classifier invocation errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Interpreter or script could not be started
    #[error("Failed to start classifier: {0}")]
    Spawn(#[source] std::io::Error),

    /// Reading the process pipes or waiting on it failed
    #[error("Classifier I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The process wrote to its error stream
    #[error("Classifier reported an error: {0}")]
    Stderr(String),

    /// Output did not have the expected structure
    #[error("Failed to parse classifier output: {0}")]
    Parse(String),

    /// Process did not finish within the configured limit
    #[error("Classifier timed out after {0:?}")]
    Timeout(Duration),
}

/// Boundary to an external classifier
///
/// Returns everything the classifier wrote to standard output, trimmed.
#[async_trait]
pub trait ClassifierGateway: Send + Sync {
    async fn classify(&self, script: &Path, args: &[String]) -> Result<String, ClassifierError>;
}

/// Maps bug reports to severity labels via a [`ClassifierGateway`]
#[derive(Clone)]
pub struct SeverityClassifier {
    gateway: Arc<dyn ClassifierGateway>,
    single_script: PathBuf,
    batch_script: PathBuf,
}

impl SeverityClassifier {
    pub fn new(
        gateway: Arc<dyn ClassifierGateway>,
        single_script: impl Into<PathBuf>,
        batch_script: impl Into<PathBuf>,
    ) -> Self {
        Self {
            gateway,
            single_script: single_script.into(),
            batch_script: batch_script.into(),
        }
    }

    /// Process-backed classifier built from service configuration
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let gateway = ProcessGateway::new(config.interpreter.clone()).with_timeout(config.timeout);
        Self::new(
            Arc::new(gateway),
            config.single_script.clone(),
            config.batch_script.clone(),
        )
    }

    /// Classify one report
    ///
    /// Title and description are passed as two separate arguments; the
    /// trimmed output is the label itself (possibly empty).
    pub async fn classify_one(&self, report: &BugReport) -> Result<String, ClassifierError> {
        let args = [report.title.clone(), report.description.clone()];
        self.gateway.classify(&self.single_script, &args).await
    }

    /// Classify a batch with a single classifier invocation
    ///
    /// The batch is sent as one JSON argument, `[[title, description], ...]`.
    /// Output must be a JSON array; entry `i` is the label for input `i`.
    /// Entries that carry no usable label come back as `None`, and the
    /// returned vector may be shorter than the input.
    pub async fn classify_batch(
        &self,
        pairs: &[[Option<String>; 2]],
    ) -> Result<Vec<Option<String>>, ClassifierError> {
        let payload =
            serde_json::to_string(pairs).map_err(|e| ClassifierError::Parse(e.to_string()))?;
        let output = self.gateway.classify(&self.batch_script, &[payload]).await?;

        let labels = parse_batch_output(&output)?;
        debug!(
            requested = pairs.len(),
            returned = labels.len(),
            "Batch classification completed"
        );
        Ok(labels)
    }
}

/// Decode batch classifier output into per-index labels
pub fn parse_batch_output(output: &str) -> Result<Vec<Option<String>>, ClassifierError> {
    let entries: Vec<Value> =
        serde_json::from_str(output).map_err(|e| ClassifierError::Parse(e.to_string()))?;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| label_from_value(i, entry))
        .collect()
}

/// Falsy JSON values (`null`, `""`, `0`, `false`) carry no label.
/// Objects and arrays are not labels at all and reject the whole output.
fn label_from_value(index: usize, value: &Value) -> Result<Option<String>, ClassifierError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(Some(s.clone())),
        Value::Number(n) if n.as_f64() != Some(0.0) => Ok(Some(n.to_string())),
        Value::Bool(true) => Ok(Some("true".to_string())),
        Value::Object(_) | Value::Array(_) => Err(ClassifierError::Parse(format!(
            "entry {} is not a severity label: {}",
            index, value
        ))),
        _ => Ok(None),
    }
}
