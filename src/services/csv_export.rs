use crate::error::{AppError, AppResult};
use crate::models::{Venue, VENUE_COLUMNS};

pub const CSV_DOWNLOAD_NAME: &str = "complete_venues.csv";

/// Renders venues as CSV: a header row, then one row per venue. Quoting
/// follows the `csv` crate defaults (only when a field needs it).
pub fn render_venues_csv(venues: &[Venue]) -> AppResult<Vec<u8>> {
    if venues.is_empty() {
        return Err(AppError::NotFound("No venue data found in the database.".to_string()));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(VENUE_COLUMNS)
        .map_err(|e| AppError::Internal(format!("Error generating CSV: {e}")))?;

    for venue in venues {
        writer
            .write_record(venue.to_record())
            .map_err(|e| AppError::Internal(format!("Error generating CSV: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Error generating CSV: {e}")))
}
