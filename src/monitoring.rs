use crate::database::DatabaseHandle;
use crate::services::CsvFileSource;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub source: CheckResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: String,
    pub message: Option<String>,
    pub response_time_ms: Option<u64>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// What the service reads its venues from.
#[derive(Clone)]
pub enum VenueSource {
    Database(DatabaseHandle),
    CsvFile(CsvFileSource),
}

pub struct HealthChecker {
    start_time: Instant,
    source: VenueSource,
}

impl HealthChecker {
    pub fn new(source: VenueSource) -> Self {
        Self {
            start_time: Instant::now(),
            source,
        }
    }

    pub async fn get_health_status(&self) -> HealthStatus {
        let source = match &self.source {
            VenueSource::Database(database) => Self::check_database(database).await,
            VenueSource::CsvFile(file) => Self::check_file(file).await,
        };

        let status = if source.status == "healthy" { "healthy" } else { "critical" };

        HealthStatus {
            status: status.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            checks: HealthChecks { source },
        }
    }

    async fn check_database(database: &DatabaseHandle) -> CheckResult {
        let pool = match database.pool() {
            Ok(pool) => pool,
            Err(e) => {
                return CheckResult {
                    status: "critical".to_string(),
                    message: Some(e.message().to_string()),
                    response_time_ms: None,
                }
            }
        };

        let start = Instant::now();
        match sqlx::query("SELECT 1").fetch_one(pool).await {
            Ok(_) => CheckResult {
                status: "healthy".to_string(),
                message: Some("Database connection successful".to_string()),
                response_time_ms: Some(start.elapsed().as_millis() as u64),
            },
            Err(e) => CheckResult {
                status: "critical".to_string(),
                message: Some(format!("Database connection failed: {e}")),
                response_time_ms: None,
            },
        }
    }

    async fn check_file(file: &CsvFileSource) -> CheckResult {
        if file.exists().await {
            CheckResult {
                status: "healthy".to_string(),
                message: Some(format!("CSV file present at {}", file.path().display())),
                response_time_ms: Some(0),
            }
        } else {
            CheckResult {
                status: "critical".to_string(),
                message: Some(format!("CSV file missing at {}", file.path().display())),
                response_time_ms: None,
            }
        }
    }
}
