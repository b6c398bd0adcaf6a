pub mod files;
pub mod monitoring;
pub mod venues;
