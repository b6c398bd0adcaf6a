use crate::api::venues::attachment;
use crate::error::{AppError, AppResult};
use crate::services::{CsvFileSource, CSV_DOWNLOAD_NAME};
use actix_files::NamedFile;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct FileState {
    pub source: CsvFileSource,
}

pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(root).service(download_csv);
}

#[get("/")]
async fn root(data: web::Data<Arc<FileState>>) -> impl Responder {
    web::Json(serde_json::json!({
        "message": "Venue CSV file exporter is running. Try /download/csv.",
        "file_path": data.source.path().display().to_string(),
    }))
}

fn open_failure(source: &CsvFileSource, e: std::io::Error) -> AppError {
    match e.kind() {
        std::io::ErrorKind::NotFound => source.missing_error(),
        _ => AppError::Internal(format!("Failed to open file for streaming: {e}")),
    }
}

#[get("/download/csv")]
#[instrument(skip(data, req))]
async fn download_csv(data: web::Data<Arc<FileState>>, req: HttpRequest) -> AppResult<HttpResponse> {
    // Check if file exists
    let path = data.source.locate().await?;

    // The crawler may replace or remove the file between the check and the open
    let file = NamedFile::open_async(path)
        .await
        .map_err(|e| open_failure(&data.source, e))?;

    info!("Streaming {} ({} bytes)", path.display(), file.metadata().len());

    // Stream with range support, forcing CSV type and attachment name
    Ok(file
        .use_etag(true)
        .use_last_modified(true)
        .set_content_type(mime::TEXT_CSV)
        .set_content_disposition(attachment(CSV_DOWNLOAD_NAME))
        .into_response(&req))
}
