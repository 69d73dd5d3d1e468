//! In-process bug store
//!
//! Same contract as the SQLite store; records live as long as the value.
//! Used by tests and for running without a database file.

use super::{validate_new_bug, BugStore, StoreError};
use async_trait::async_trait;
use sevtrack_common::{BugRecord, NewBug};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryBugStore {
    records: Arc<RwLock<Vec<BugRecord>>>,
}

impl MemoryBugStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, in insertion order
    pub async fn records(&self) -> Vec<BugRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl BugStore for MemoryBugStore {
    async fn save_one(&self, bug: NewBug) -> Result<BugRecord, StoreError> {
        validate_new_bug(&bug)?;
        let record = BugRecord::from_new(bug);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn save_many(&self, bugs: Vec<NewBug>) -> Result<usize, StoreError> {
        for bug in &bugs {
            validate_new_bug(bug)?;
        }
        let count = bugs.len();
        let mut records = self.records.write().await;
        records.extend(bugs.into_iter().map(BugRecord::from_new));
        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BugRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevtrack_common::BugReport;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryBugStore::new();
        let saved = store
            .save_one(NewBug::classified(BugReport::new("t", "d"), Some("Low".into())))
            .await
            .unwrap();

        assert_eq!(store.find_by_id(saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_save_many_rejects_whole_batch() {
        let store = MemoryBugStore::new();
        let good = NewBug::classified(BugReport::new("t", "d"), None);
        let bad = NewBug::classified(BugReport::new("t", ""), None);

        assert!(store.save_many(vec![good, bad]).await.is_err());
        assert!(store.is_empty().await);
    }
}
