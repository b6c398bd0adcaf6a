pub mod csv_export;
pub mod file_source;
pub mod venue_repository;

pub use csv_export::{render_venues_csv, CSV_DOWNLOAD_NAME};
pub use file_source::CsvFileSource;
pub use venue_repository::{VenueRepository, VenueStore};
