use engine_core::error::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to publish batch at offset {offset} (size {batch_size})")]
    Publish { offset: usize, batch_size: usize },

    #[error("Retry attempts exhausted: {0}")]
    RetriesExhausted(String),
}
