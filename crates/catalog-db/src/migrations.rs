//! # Database Migrations
//!
//! Embedded SQL migrations for the catalog.
//!
//! ## Migration Set
//! ```text
//! migrations/sqlite/
//! ├── 001_products.sql      # Catalog store (append-only products table)
//! └── 002_products_fts.sql  # Trigram FTS5 search index + backfill
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Write idempotent SQL (use `IF NOT EXISTS` where possible)
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Transactional: each migration runs in a transaction
/// - Ordered: migrations run in filename order (001, 002, ...)
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)` for health reporting.
///
/// A store that has never been migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(u32, u32)> {
    let total = MIGRATOR.migrations.len() as u32;

    let applied: i64 =
        match sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
        {
            Ok(applied) => applied,
            Err(sqlx::Error::Database(_)) => 0,
            Err(err) => return Err(err.into()),
        };

    Ok((total, applied as u32))
}
