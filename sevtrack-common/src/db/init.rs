//! Database initialization
//!
//! Opens (or creates) the SQLite database and ensures the `bugs` table exists.
//! Schema creation is idempotent and runs on every start.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Connect to `database_url` and create tables if needed
///
/// Accepts any sqlx SQLite URL (`sqlite://path.db`, `sqlite::memory:`).
/// The database file and its parent directory are created when missing.
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let in_memory = database_url.contains(":memory:");
    if !in_memory {
        if let Some(parent) = options.get_filename().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    // An in-memory database lives only as long as its single connection
    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?
    };

    if !in_memory {
        sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    }
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_bugs_table(&pool).await?;

    info!("Database ready: {}", database_url);
    Ok(pool)
}

/// Create the `bugs` table
///
/// `title` and `description` are required at write time; `severity` is
/// nullable at the schema level.
pub async fn create_bugs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bugs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL CHECK (length(title) > 0),
            description TEXT NOT NULL CHECK (length(description) > 0),
            severity TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bugs_created_at ON bugs(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}
