//! Bug record persistence
//!
//! [`BugStore`] is the persistence contract used by the handlers. The
//! production implementation is [`SqliteBugStore`]; [`MemoryBugStore`] keeps
//! records in process memory with the same validation rules.

use async_trait::async_trait;
use sevtrack_common::{BugRecord, NewBug};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBugStore;
pub use sqlite::SqliteBugStore;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure (connectivity, constraint, I/O)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Record failed write-time schema validation
    #[error("Validation failed: {0}")]
    Constraint(String),

    /// Stored row could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait BugStore: Send + Sync {
    /// Insert one record, returning it with its generated id
    async fn save_one(&self, bug: NewBug) -> Result<BugRecord, StoreError>;

    /// Insert all records as one unit of work, returning how many were written
    async fn save_many(&self, bugs: Vec<NewBug>) -> Result<usize, StoreError>;

    /// Fetch a record by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BugRecord>, StoreError>;
}

/// Write-time schema check: `title` and `description` must be present
pub fn validate_new_bug(bug: &NewBug) -> Result<(), StoreError> {
    if bug.title.is_empty() {
        return Err(StoreError::Constraint("Path `title` is required.".to_string()));
    }
    if bug.description.is_empty() {
        return Err(StoreError::Constraint(
            "Path `description` is required.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug(title: &str, description: &str) -> NewBug {
        NewBug {
            title: title.to_string(),
            description: description.to_string(),
            severity: None,
        }
    }

    #[test]
    fn test_validate_accepts_missing_severity() {
        assert!(validate_new_bug(&bug("t", "d")).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert!(matches!(
            validate_new_bug(&bug("", "d")),
            Err(StoreError::Constraint(_))
        ));
        assert!(matches!(
            validate_new_bug(&bug("t", "")),
            Err(StoreError::Constraint(_))
        ));
    }
}
