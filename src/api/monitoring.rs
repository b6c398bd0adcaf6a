use crate::monitoring::HealthChecker;
use actix_web::{get, web, HttpResponse, Responder};
use std::sync::Arc;

pub struct MonitoringState {
    pub health_checker: HealthChecker,
}

pub fn configure_monitoring_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(liveness_check);
}

/// Reports the venue source. Critical sources answer 503 with the same body.
#[get("/health")]
async fn health_check(data: web::Data<Arc<MonitoringState>>) -> impl Responder {
    let health_status = data.health_checker.get_health_status().await;

    if health_status.is_healthy() {
        HttpResponse::Ok().json(health_status)
    } else {
        HttpResponse::ServiceUnavailable().json(health_status)
    }
}

#[get("/health/live")]
async fn liveness_check() -> impl Responder {
    web::Json(serde_json::json!({
        "status": "alive",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
