mod logging;
mod run;

pub use logging::init_run_logging;
pub use run::{RunContext, RunPaths, RunStatus, finish_run, relative_to, start_run};

use thiserror::Error;

/// Errors raised while recording run artifacts.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid output path: {0}")]
    InvalidPath(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
