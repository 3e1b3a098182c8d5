use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("credentials file not found: {}", .0.display())]
    MissingCredentials(PathBuf),
}
