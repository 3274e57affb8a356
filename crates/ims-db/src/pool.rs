//! # Inventory Store
//!
//! Opens the SQLite file that holds the catalogue, the sales table and the
//! stock log, and hands out repositories over one shared pool.
//!
//! ```text
//!   AppConfig::connect ─► DbConfig ─► Database::new ─► migrations
//!                                          │
//!        ┌──────────────┬──────────────┬───┴──────────┬─────────────┐
//!     ledger()      products()      stats()        sales()    stock_logs()
//!   sale/restock   create/update   dashboard       history      audit trail
//! ```
//!
//! Ledger writes serialize on SQLite's write lock; a writer that cannot get
//! it within `busy_timeout` fails with a store error rather than blocking
//! forever. WAL journaling lets dashboard and catalogue reads proceed from
//! a snapshot while a sale commits.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::ledger::LedgerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::stats::StatsRepository;
use crate::repository::stock_log::StockLogRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the inventory file lives and how the pool around it behaves.
///
/// ```rust,ignore
/// let config = DbConfig::new(data_dir.join("inventory.db")).busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Inventory file, or `:memory:`.
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Wait for a free pooled connection.
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// How long a sale or restock waits on the write lock before failing.
    pub busy_timeout: Duration,
    /// Apply pending schema migrations in [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed store: 5 connections, 5s busy timeout, migrations on.
    /// The file is created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Private in-memory store, one per `Database`.
    ///
    /// Limited to a single connection: each SQLite connection to
    /// `:memory:` would otherwise see its own empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(3600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the inventory store. Clones share one pool.
///
/// ```rust,ignore
/// let receipt = db.ledger().record_sale(product_id, 2).await?;
/// let stats = db.stats().dashboard().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the store and applies pending migrations.
    ///
    /// Every connection runs with WAL journaling, `synchronous = NORMAL`,
    /// foreign keys on and the configured busy timeout.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // category_id and product_id references
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);

        debug!(busy_timeout_ms = config.busy_timeout.as_millis() as u64, "Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations; already-applied ones are skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns `(total, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Catalogue reads, create and update.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Sales and restocks.
    pub fn ledger(&self) -> LedgerRepository {
        LedgerRepository::new(self.pool.clone())
    }

    /// Sale history reads.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Stock log reads.
    pub fn stock_logs(&self) -> StockLogRepository {
        StockLogRepository::new(self.pool.clone())
    }

    /// Dashboard aggregates.
    pub fn stats(&self) -> StatsRepository {
        StatsRepository::new(self.pool.clone())
    }

    /// Closes the pool; later operations fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// True if the store answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}
