//! # Schema Migrations
//!
//! Migrations are embedded from the `migrations/` directory at compile time
//! and tracked by sqlx in `_sqlx_migrations`. Files follow the
//! `YYYYMMDDHHMMSS_description.sql` naming convention and are applied in
//! version order. sqlx takes a PostgreSQL advisory lock while migrating, so
//! concurrent starters do not race.

use crate::error::SwiggyResult;
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply every pending migration
pub async fn run_migrations(pool: &PgPool) -> SwiggyResult<()> {
    MIGRATOR.run(pool).await?;
    info!(
        available = MIGRATOR.iter().count(),
        "Database migrations up to date"
    );
    Ok(())
}

/// Versions and descriptions of the embedded migrations
pub fn embedded_migrations() -> Vec<(i64, String)> {
    MIGRATOR
        .iter()
        .map(|migration| (migration.version, migration.description.to_string()))
        .collect()
}
