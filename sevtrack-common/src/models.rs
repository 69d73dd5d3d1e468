//! Bug report and bug record models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity stored when the classifier produced no usable label
pub const UNKNOWN_SEVERITY: &str = "Unknown";

/// Incoming bug report (single submission)
///
/// Has no identity until persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugReport {
    pub title: String,
    pub description: String,
}

impl BugReport {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Bug record ready to be written, severity already merged in
///
/// The store assigns `id` and `created_at` on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub severity: Option<String>,
}

impl NewBug {
    /// Build a record from a report and a classifier label
    ///
    /// An absent or empty label resolves to [`UNKNOWN_SEVERITY`].
    pub fn classified(report: BugReport, severity: Option<String>) -> Self {
        Self {
            title: report.title,
            description: report.description,
            severity: Some(resolve_severity(severity)),
        }
    }
}

/// Persisted bug record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub severity: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BugRecord {
    /// Assign identity to a new bug
    pub fn from_new(bug: NewBug) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: bug.title,
            description: bug.description,
            severity: bug.severity,
            created_at: Utc::now(),
        }
    }
}

/// Collapse a missing or blank label to the `"Unknown"` sentinel
pub fn resolve_severity(label: Option<String>) -> String {
    match label {
        Some(label) if !label.is_empty() => label,
        _ => UNKNOWN_SEVERITY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_severity_keeps_label() {
        assert_eq!(resolve_severity(Some("High".to_string())), "High");
    }

    #[test]
    fn test_resolve_severity_sentinel() {
        assert_eq!(resolve_severity(None), UNKNOWN_SEVERITY);
        assert_eq!(resolve_severity(Some(String::new())), UNKNOWN_SEVERITY);
    }

    #[test]
    fn test_from_new_generates_distinct_ids() {
        let bug = NewBug::classified(BugReport::new("Crash", "On save"), Some("Critical".into()));
        let a = BugRecord::from_new(bug.clone());
        let b = BugRecord::from_new(bug);

        assert_ne!(a.id, b.id);
        assert_eq!(a.severity.as_deref(), Some("Critical"));
        assert_eq!(a.title, "Crash");
    }

    #[test]
    fn test_record_serializes_expected_fields() {
        let record = BugRecord::from_new(NewBug::classified(BugReport::new("t", "d"), None));
        let json = serde_json::to_value(&record).unwrap();

        assert!(json["id"].is_string());
        assert_eq!(json["title"], "t");
        assert_eq!(json["description"], "d");
        assert_eq!(json["severity"], "Unknown");
        assert!(json["created_at"].is_string());
    }
}
