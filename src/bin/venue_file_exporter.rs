use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use venue_exporter::api::files::{configure_file_routes, FileState};
use venue_exporter::api::monitoring::{configure_monitoring_routes, MonitoringState};
use venue_exporter::config::load_config;
use venue_exporter::middleware::RequestTracking;
use venue_exporter::monitoring::{HealthChecker, VenueSource};
use venue_exporter::services::CsvFileSource;
use venue_exporter::telemetry::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize structured logging
    init_logging("venue_exporter=info,venue_file_exporter=info,actix_web=info");

    info!("Starting venue file exporter v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config();
    let server_config = config.server.clone();

    // Resolve the mounted CSV; absence is only a warning, requests re-check it
    let source = CsvFileSource::new(&config.files);
    info!("Serving CSV file from {}", source.path().display());
    if !source.exists().await {
        warn!("CSV file is not present yet at {}", source.path().display());
    }

    let file_state = Arc::new(FileState { source: source.clone() });
    let monitoring_state = Arc::new(MonitoringState {
        health_checker: HealthChecker::new(VenueSource::CsvFile(source)),
    });

    // Start HTTP server with request tracking and tracing
    info!("Starting server on {}:{}", server_config.host, server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTracking)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(file_state.clone()))
            .app_data(web::Data::new(monitoring_state.clone()))
            .configure(configure_file_routes)
            .configure(configure_monitoring_routes)
    })
    .client_request_timeout(server_config.client_timeout)
    .keep_alive(server_config.keep_alive)
    .bind((server_config.host, server_config.port))?
    .run()
    .await
}
