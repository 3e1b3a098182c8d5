use thiserror::Error;

use crate::dispatch::DispatchError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input not found: {0}")]
    InputNotFound(String),
    #[error("no files matching *{suffix} in {dir}")]
    NoInput { dir: String, suffix: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("dispatch setup failed: {0}")]
    Dispatch(#[from] DispatchError),
}
