use crate::config::{DatabaseSettings, PoolConfig};
use crate::error::{AppError, AppResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, info};

pub async fn create_database_pool(settings: &DatabaseSettings, pool_config: &PoolConfig) -> AppResult<PgPool> {
    info!("Connecting to database using DSN: {}", settings.redacted_url());
    info!(
        "Configuring database pool with {}..{} connections, acquire timeout {:?}",
        pool_config.min_connections, pool_config.max_connections, pool_config.acquire_timeout
    );

    let connect_options = settings.connect_options()?;

    let pool = PgPoolOptions::new()
        .min_connections(pool_config.min_connections)
        .max_connections(pool_config.max_connections)
        .acquire_timeout(pool_config.acquire_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create database pool: {e}")))?;

    Ok(pool)
}

/// Process-lifetime handle to the pool. Empty when startup could not connect,
/// in which case every data request fails fast with 503.
#[derive(Clone, Default)]
pub struct DatabaseHandle {
    pool: Option<PgPool>,
}

impl DatabaseHandle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn unavailable() -> Self {
        Self { pool: None }
    }

    /// Resolves settings from `lookup` and opens the pool. Any failure is
    /// logged and yields an unavailable handle instead of aborting startup.
    pub async fn connect<F>(lookup: F, pool_config: &PoolConfig) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = match DatabaseSettings::resolve(lookup) {
            Ok(settings) => settings,
            Err(e) => {
                error!("Could not resolve database configuration: {}", e);
                return Self::unavailable();
            }
        };

        match create_database_pool(&settings, pool_config).await {
            Ok(pool) => {
                info!("Database connection pool created successfully");
                Self::new(pool)
            }
            Err(e) => {
                error!("Could not connect to PostgreSQL on startup: {}", e);
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.pool.as_ref().is_some_and(|pool| !pool.is_closed())
    }

    pub fn pool(&self) -> AppResult<&PgPool> {
        match &self.pool {
            Some(pool) if !pool.is_closed() => Ok(pool),
            _ => Err(AppError::ServiceUnavailable(
                "Database service not available. Check exporter service logs.".to_string(),
            )),
        }
    }

    /// Waits for checked-out connections to return and closes the pool.
    /// Safe to call more than once and on an unavailable handle.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            if !pool.is_closed() {
                pool.close().await;
                info!("Database connection pool closed");
            }
        }
    }
}
