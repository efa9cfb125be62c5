//! Database lifecycle management for Tienda.
//!
//! Provides migration running, status checking, and bulk document import.

#![warn(missing_docs)]

mod import;

pub use import::{import_documents, prepare_document, ImportSummary};

use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::{info, warn};

/// Result type for DB operations.
pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// One applied migration.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationInfo {
    /// Migration version (timestamp prefix of the file name)
    pub version: i64,
    /// Description taken from the file name
    pub description: String,
    /// Whether the migration applied cleanly
    pub success: bool,
}

/// Connectivity and schema state of the database.
#[derive(Debug, Clone, Serialize)]
pub struct DbStatus {
    /// Most recent migrations first; empty if none were run
    pub migrations: Vec<MigrationInfo>,
    /// Whether the `documents` table exists
    pub documents_table: bool,
    /// Stored documents across all collections
    pub document_count: i64,
}

/// Run all pending migrations.
///
/// Uses sqlx migrations from the workspace `migrations` directory.
/// Idempotent: safe to run multiple times.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    sqlx::migrate!("../migrations").run(pool).await?;

    info!("Migrations completed successfully");
    Ok(())
}

/// Check database connectivity and migration status.
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let result: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;

    if result != 1 {
        return Err(anyhow::anyhow!("Database connectivity check failed"));
    }

    info!("Database connectivity: OK");

    // Runtime query: the migrations table may not exist yet.
    let rows = sqlx::query(
        r#"
        SELECT version, description, success
        FROM _sqlx_migrations
        ORDER BY version DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await;

    let migrations = match rows {
        Ok(rows) => rows
            .iter()
            .map(|row| -> Result<MigrationInfo> {
                Ok(MigrationInfo {
                    version: row.try_get("version")?,
                    description: row.try_get("description")?,
                    success: row.try_get("success")?,
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Err(e) if e.to_string().contains("_sqlx_migrations") => {
            warn!("Migration table not found (run `tienda db migrate` first)");
            Vec::new()
        },
        Err(e) => return Err(e.into()),
    };

    for mig in &migrations {
        let mark = if mig.success { "ok" } else { "FAILED" };
        info!(version = mig.version, description = %mig.description, "Migration {}", mark);
    }

    let documents_table: bool =
        sqlx::query_scalar("SELECT to_regclass('public.documents') IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let document_count = if documents_table {
        sqlx::query_scalar("SELECT COUNT(*) FROM documents").fetch_one(pool).await?
    } else {
        warn!("Table `documents` not found (run `tienda db migrate` first)");
        0
    };

    Ok(DbStatus { migrations, documents_table, document_count })
}
