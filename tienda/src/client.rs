//! Store client construction.
//!
//! The store handle is built once from [`Config`] and shared through the
//! returned [`Records`] facade.

use std::sync::Arc;
use tracing::info;

use tienda_store::{MemoryStore, Records};

use crate::config::{Backend, Config, DatabaseConfig};
use crate::error::{AppError, AppResult};

/// Build the record facade for the configured backend.
///
/// # Errors
/// `AppError::Config` when the backend cannot be used with this build or
/// configuration; `AppError::Store` when the database is unreachable.
pub async fn connect(config: &Config) -> AppResult<Records> {
    info!(
        backend = %config.database.backend,
        project_id = %config.credentials.project_id,
        client_email = %config.credentials.client_email,
        "Connecting to document store"
    );

    match config.database.backend {
        Backend::Memory => Ok(Records::new(Arc::new(MemoryStore::new()))),
        Backend::Postgres => connect_postgres(&config.database).await,
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres(database: &DatabaseConfig) -> AppResult<Records> {
    let pool = connect_pool(database).await?;
    Ok(Records::new(Arc::new(tienda_store::PgDocumentStore::new(Arc::new(pool)))))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_database: &DatabaseConfig) -> AppResult<Records> {
    Err(AppError::Config(
        "postgres backend requires building with the `postgres` feature".to_string(),
    ))
}

/// Open a PostgreSQL pool.
#[cfg(feature = "postgres")]
pub async fn connect_pool(database: &DatabaseConfig) -> AppResult<sqlx::PgPool> {
    let url = database.url.as_deref().ok_or_else(|| {
        AppError::Config("DATABASE_URL is required for the postgres backend".to_string())
    })?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect(url)
        .await
        .map_err(tienda_store::StoreError::from)?;

    info!(max_connections = database.max_connections, "Connected to PostgreSQL");
    Ok(pool)
}
