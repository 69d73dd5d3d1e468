//! SQLite-backed bug store

use super::{validate_new_bug, BugStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sevtrack_common::{BugRecord, NewBug};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

/// Bug store over the `bugs` table
#[derive(Clone)]
pub struct SqliteBugStore {
    db: SqlitePool,
}

impl SqliteBugStore {
    /// Wrap a pool whose schema is already initialized
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }
}

async fn insert_record<'e, E>(executor: E, record: &BugRecord) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO bugs (id, title, description, severity, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.severity)
    .bind(record.created_at.to_rfc3339())
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl BugStore for SqliteBugStore {
    async fn save_one(&self, bug: NewBug) -> Result<BugRecord, StoreError> {
        validate_new_bug(&bug)?;
        let record = BugRecord::from_new(bug);

        insert_record(&self.db, &record).await?;

        debug!(id = %record.id, "Inserted bug record");
        Ok(record)
    }

    async fn save_many(&self, bugs: Vec<NewBug>) -> Result<usize, StoreError> {
        for bug in &bugs {
            validate_new_bug(bug)?;
        }

        let records: Vec<BugRecord> = bugs.into_iter().map(BugRecord::from_new).collect();

        let mut tx = self.db.begin().await?;
        for record in &records {
            insert_record(&mut *tx, record).await?;
        }
        tx.commit().await?;

        debug!(count = records.len(), "Inserted bug records");
        Ok(records.len())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BugRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, title, description, severity, created_at FROM bugs WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row.get("id");
        let created_at: String = row.get("created_at");

        Ok(Some(BugRecord {
            id: Uuid::parse_str(&id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
            title: row.get("title"),
            description: row.get("description"),
            severity: row.get("severity"),
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?
                .with_timezone(&Utc),
        }))
    }
}
