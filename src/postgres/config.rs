use deadpool_postgres::{Config as PgConfig, Pool, PoolConfig};
use tokio_postgres::NoTls;

use crate::config::PgSettings;
use crate::error::TaskDbError;

/// Connections kept by the pool; the drivers never run two statements at once.
const POOL_MAX_SIZE: usize = 2;

impl PgSettings {
    /// Translate the settings into a `deadpool_postgres::Config`.
    #[must_use]
    pub fn to_pg_config(&self) -> PgConfig {
        let mut cfg = PgConfig::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());
        cfg.pool = Some(PoolConfig::new(POOL_MAX_SIZE));
        cfg
    }
}

/// Build a connection pool for the task tracker.
///
/// No connection is opened here; the first scoped acquisition does that.
///
/// # Errors
/// Returns `TaskDbError::ConfigError` if a required setting is empty or
/// `TaskDbError::ConnectionError` if pool creation fails.
pub fn create_pool(settings: &PgSettings) -> Result<Pool, TaskDbError> {
    if settings.dbname.trim().is_empty() {
        return Err(TaskDbError::ConfigError("dbname is required".to_string()));
    }
    if settings.host.trim().is_empty() {
        return Err(TaskDbError::ConfigError("host is required".to_string()));
    }
    if settings.port == 0 {
        return Err(TaskDbError::ConfigError("port is required".to_string()));
    }
    if settings.user.trim().is_empty() {
        return Err(TaskDbError::ConfigError("user is required".to_string()));
    }

    settings
        .to_pg_config()
        .create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)
        .map_err(|e| TaskDbError::ConnectionError(format!("Failed to create Postgres pool: {e}")))
}
