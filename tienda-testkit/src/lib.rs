//! Test helpers for Tienda.
//!
//! Provides substitute stores that fail on demand and seeding helpers for
//! products and line items.

mod helpers;
mod stub;

pub use helpers::{fields, line_items, seed_product, seeded_records};
pub use stub::{FailingStore, FaultyStore};

/// Setup a clean test database by running migrations.
///
/// Convenience function for tests that need a fresh schema.
/// Note: migrations are located at `migrations/` relative to the workspace root.
#[cfg(feature = "postgres")]
pub async fn setup_test_db(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../migrations").run(pool).await?;
    Ok(())
}
