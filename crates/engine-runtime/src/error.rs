use engine_config::settings::error::SettingsError;
use engine_core::error::{SourceError, StateStoreError};
use engine_processing::error::SyncError;
use thiserror::Error;

/// Top-level errors for the sync service.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration is missing or invalid.
    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("Watermark store error: {0}")]
    State(#[from] StateStoreError),

    /// Binding or serving the trigger endpoint failed.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while joining a task.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
