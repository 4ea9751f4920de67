use connectors::sql::base::error::{ConnectorError, DbError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("Watermark store error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Failed to encode watermark entry: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Watermark store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum SinkError {
    /// Transport-level failure: DNS, connect, TLS, body streaming.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("Sink rejected batch with status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source connection failed: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Source query failed: {0}")]
    Database(#[from] DbError),
}
