use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use venue_exporter::api::monitoring::{configure_monitoring_routes, MonitoringState};
use venue_exporter::api::venues::{configure_venue_routes, VenueState};
use venue_exporter::config::load_config;
use venue_exporter::database::DatabaseHandle;
use venue_exporter::middleware::RequestTracking;
use venue_exporter::monitoring::{HealthChecker, VenueSource};
use venue_exporter::services::VenueRepository;
use venue_exporter::telemetry::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize structured logging
    init_logging("venue_exporter=info,venue_db_exporter=info,actix_web=info");

    info!("Starting venue DB exporter v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config();
    let server_config = config.server.clone();

    // Startup continues without a pool; data endpoints answer 503 until restart.
    let database = DatabaseHandle::connect(|key| std::env::var(key).ok(), &config.pool).await;

    // Initialize services
    let venue_state = Arc::new(VenueState {
        repository: Arc::new(VenueRepository::new(database.clone())),
    });
    let monitoring_state = Arc::new(MonitoringState {
        health_checker: HealthChecker::new(VenueSource::Database(database.clone())),
    });

    // Start HTTP server with request tracking and tracing
    info!("Starting server on {}:{}", server_config.host, server_config.port);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(RequestTracking)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(venue_state.clone()))
            .app_data(web::Data::new(monitoring_state.clone()))
            .configure(configure_venue_routes)
            .configure(configure_monitoring_routes)
    })
    .client_request_timeout(server_config.client_timeout)
    .keep_alive(server_config.keep_alive)
    .bind((server_config.host, server_config.port))?
    .run()
    .await;

    // Release pooled connections once the server has stopped
    database.close().await;
    info!("Venue DB exporter stopped");

    result
}
