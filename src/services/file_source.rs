use crate::config::FileSourceConfig;
use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The crawler-produced CSV on the mounted volume.
#[derive(Clone, Debug)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(config: &FileSourceConfig) -> Self {
        Self {
            path: config.file_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks the file on every call; nothing is cached.
    pub async fn exists(&self) -> bool {
        matches!(tokio::fs::metadata(&self.path).await, Ok(meta) if meta.is_file())
    }

    pub async fn locate(&self) -> AppResult<&Path> {
        if self.exists().await {
            debug!("Serving CSV file from {}", self.path.display());
            return Ok(&self.path);
        }

        Err(self.missing_error())
    }

    pub fn missing_error(&self) -> AppError {
        warn!("CSV file not found at {}", self.path.display());
        AppError::NotFound(format!(
            "CSV file not found at {}. The crawler may not have run yet, or the volume is not mounted correctly.",
            self.path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvFileSource::new(&FileSourceConfig {
            data_dir: dir.path().to_path_buf(),
            file_name: "complete_venues.csv".to_string(),
        });

        let err = source.locate().await.unwrap_err();
        let expected = dir.path().join("complete_venues.csv");
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains(&*expected.to_string_lossy())));
    }

    #[actix_web::test]
    async fn existence_is_checked_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvFileSource::new(&FileSourceConfig {
            data_dir: dir.path().to_path_buf(),
            file_name: "venues.csv".to_string(),
        });
        assert!(!source.exists().await);

        std::fs::write(dir.path().join("venues.csv"), "name\n").unwrap();
        assert!(source.exists().await);
        assert_eq!(source.locate().await.unwrap(), dir.path().join("venues.csv"));
    }

    #[actix_web::test]
    async fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("complete_venues.csv")).unwrap();
        let source = CsvFileSource::new(&FileSourceConfig {
            data_dir: dir.path().to_path_buf(),
            file_name: "complete_venues.csv".to_string(),
        });

        assert!(!source.exists().await);
    }
}
