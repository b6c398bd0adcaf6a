use crate::error::{AppError, AppResult};
use crate::services::{render_venues_csv, VenueStore, CSV_DOWNLOAD_NAME};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

pub struct VenueState {
    pub repository: Arc<dyn VenueStore>,
}

pub fn configure_venue_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(root).service(list_venues).service(download_csv);
}

pub(crate) fn attachment(filename: &str) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(filename.to_string())],
    }
}

#[get("/")]
async fn root() -> impl Responder {
    web::Json(serde_json::json!({
        "message": "Venue CSV exporter backed by PostgreSQL is running. Try /download/csv or /venues."
    }))
}

#[get("/venues")]
#[instrument(skip(data))]
async fn list_venues(data: web::Data<Arc<VenueState>>) -> AppResult<impl Responder> {
    let venues = data.repository.list_venues().await?;
    debug!("Returning {} venues as JSON", venues.len());
    Ok(web::Json(venues))
}

#[get("/download/csv")]
#[instrument(skip(data))]
async fn download_csv(data: web::Data<Arc<VenueState>>) -> AppResult<HttpResponse> {
    // Fails fast with 503 when the pool is unavailable
    let venues = data.repository.list_venues().await.inspect_err(|e| {
        if matches!(e, AppError::Internal(_)) {
            error!("Error fetching venues for CSV export: {}", e);
        }
    })?;

    // Empty table is a 404 here, unlike the JSON listing
    let body = render_venues_csv(&venues).inspect_err(|e| {
        if matches!(e, AppError::Internal(_)) {
            error!("Error generating CSV: {}", e);
        }
    })?;

    info!("Exporting {} venues as CSV, {} bytes", venues.len(), body.len());

    // Whole body in one response, saved by the client as an attachment
    Ok(HttpResponse::Ok()
        .content_type(mime::TEXT_CSV)
        .insert_header(attachment(CSV_DOWNLOAD_NAME))
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseHandle;
    use crate::models::Venue;
    use crate::services::VenueRepository;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use async_trait::async_trait;

    struct FixedVenues(Vec<Venue>);

    #[async_trait]
    impl VenueStore for FixedVenues {
        async fn list_venues(&self) -> AppResult<Vec<Venue>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenTable;

    #[async_trait]
    impl VenueStore for BrokenTable {
        async fn list_venues(&self) -> AppResult<Vec<Venue>> {
            Err(AppError::Internal(
                "Database error: relation \"venues\" does not exist".to_string(),
            ))
        }
    }

    fn state(repository: Arc<dyn VenueStore>) -> web::Data<Arc<VenueState>> {
        web::Data::new(Arc::new(VenueState { repository }))
    }

    fn unavailable_state() -> web::Data<Arc<VenueState>> {
        state(Arc::new(VenueRepository::new(DatabaseHandle::unavailable())))
    }

    fn hall() -> Venue {
        Venue {
            name: Some("A Hall".to_string()),
            location: Some("X".to_string()),
            price: Some(100.0),
            capacity: Some(50),
            rating: Some(4.5),
            reviews: Some(10),
            description: Some("nice".to_string()),
        }
    }

    #[actix_web::test]
    async fn root_always_answers() {
        let app = test::init_service(
            App::new()
                .app_data(unavailable_state())
                .configure(configure_venue_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn data_endpoints_are_503_without_pool() {
        let app = test::init_service(
            App::new()
                .app_data(unavailable_state())
                .configure(configure_venue_routes),
        )
        .await;

        for uri in ["/venues", "/download/csv"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error_type"], "service_unavailable");
            assert!(body["detail"].as_str().unwrap().contains("Database service not available"));
        }
    }

    #[actix_web::test]
    async fn empty_table_lists_nothing_but_csv_is_404() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FixedVenues(Vec::new()))))
                .configure(configure_venue_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/venues").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!([]));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/download/csv").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error_type"], "not_found");
    }

    #[actix_web::test]
    async fn csv_download_is_an_attachment() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FixedVenues(vec![hall()]))))
                .configure(configure_venue_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/download/csv").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/csv");
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"complete_venues.csv\""
        );

        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "name,location,price,capacity,rating,reviews,description",
                "A Hall,X,100,50,4.5,10,nice",
            ]
        );
    }

    #[actix_web::test]
    async fn venues_listing_returns_rows() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FixedVenues(vec![hall()]))))
                .configure(configure_venue_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/venues").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body[0]["name"], "A Hall");
        assert_eq!(body[0]["capacity"], 50);
        assert_eq!(body[0]["rating"], 4.5);
    }

    #[actix_web::test]
    async fn query_failure_is_500_with_detail() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(BrokenTable)))
                .configure(configure_venue_routes),
        )
        .await;

        for uri in ["/venues", "/download/csv"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error_type"], "internal_error");
            assert!(body["detail"].as_str().unwrap().contains("does not exist"));
        }
    }

    #[actix_web::test]
    async fn attachment_header_quotes_filename() {
        assert_eq!(
            attachment(CSV_DOWNLOAD_NAME).to_string(),
            "attachment; filename=\"complete_venues.csv\""
        );
    }
}
