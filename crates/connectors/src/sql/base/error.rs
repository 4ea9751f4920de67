use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// A value came back in a shape we cannot decode.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Errors happening during adapter or connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The connection string could not be parsed.
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    /// The connection string names a database we do not speak.
    #[error("Unsupported database scheme: {0}")]
    UnsupportedScheme(String),

    /// TLS connector could not be built.
    #[error("TLS configuration error: {0}")]
    TlsConfig(#[from] native_tls::Error),

    /// The driver failed to establish or prepare the session.
    #[error("Connection error: {0}")]
    Connection(#[from] tokio_postgres::Error),
}
