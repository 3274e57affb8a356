//! # Database Migrations
//!
//! Embedded SQL migrations for the inventory schema.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Database::new                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs _sqlx_migrations                       │
//! │       │                                                                 │
//! │       ├── 001_initial_schema.sql      ✓ (already applied)             │
//! │       └── 002_default_categories.sql  ⬜ (NEW - needs to run)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record each one                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::DbResult;

/// Embedded migrations from the `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent, and each migration runs in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!(count = MIGRATOR.migrations.len(), "All migrations applied successfully");
    Ok(())
}

/// Number of migrations embedded in this build.
pub fn embedded_count() -> usize {
    MIGRATOR.migrations.len()
}

/// Returns information about migrations.
///
/// ## Returns
/// Tuple of (total_migrations, applied_migrations). A database that has
/// never been migrated has no `_sqlx_migrations` table and reports zero
/// applied; any other failure is returned as an error.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = embedded_count();

    let applied: i64 = match sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
    {
        Ok(count) => count,
        Err(sqlx::Error::Database(e)) if e.message().contains("no such table") => {
            debug!("Migration table missing, nothing applied yet");
            0
        }
        Err(e) => {
            warn!(error = %e, "Could not read migration table");
            return Err(e.into());
        }
    };

    Ok((total, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_status_before_and_after_migrating() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, embedded_count());
        assert_eq!(applied, 0);

        run_migrations(db.pool()).await.unwrap();
        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(applied, total);
    }

    #[tokio::test]
    async fn test_status_on_closed_pool_is_an_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let err = migration_status(db.pool()).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
        assert!(err.is_store_unavailable());
    }
}
