use engine_config::settings::error::SettingsError;
use engine_core::error::{SourceError, StateStoreError};
use engine_runtime::error::RuntimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Watermark store error: {0}")]
    State(#[from] StateStoreError),

    #[error("Invalid timestamp '{0}', expected RFC 3339 (e.g. 2024-05-01T00:00:00Z)")]
    InvalidTimestamp(String),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}
