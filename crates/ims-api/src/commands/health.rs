//! # Health Command
//!
//! Liveness of the store plus migration progress, for load balancers and
//! the status bar.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use ims_db::{migrations, Database};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: String,
    /// "connected" or "unreachable"
    pub database: String,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub version: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "ok"
    }
}

/// Reports whether the store answers and all migrations are applied.
///
/// Never fails on an unreachable store; that is reported as `degraded`.
pub async fn health_check(db: &Database) -> Result<HealthResponse, ApiError> {
    debug!("health_check command");

    let connected = db.health_check().await;
    let (total, applied) = if connected {
        db.migration_status().await?
    } else {
        (migrations::embedded_count(), 0)
    };

    let healthy = connected && applied >= total;
    if !healthy {
        warn!(connected, total, applied, "Health check degraded");
    }

    Ok(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        database: if connected { "connected" } else { "unreachable" }.to_string(),
        migrations_total: total,
        migrations_applied: applied,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ims_db::DbConfig;

    #[tokio::test]
    async fn test_health_ok() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let health = health_check(&db).await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.database, "connected");
        assert!(health.migrations_total > 0);
        assert_eq!(health.migrations_applied, health.migrations_total);
    }

    #[tokio::test]
    async fn test_health_without_migrations() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let health = health_check(&db).await.unwrap();
        assert!(!health.is_healthy());
        assert_eq!(health.migrations_applied, 0);
    }

    #[tokio::test]
    async fn test_health_on_closed_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let health = health_check(&db).await.unwrap();
        assert!(!health.is_healthy());
        assert_eq!(health.database, "unreachable");
        assert_eq!(health.migrations_applied, 0);
        assert!(health.migrations_total > 0);
    }
}
