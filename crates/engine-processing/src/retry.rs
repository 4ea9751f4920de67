use connectors::sql::base::error::{ConnectorError, DbError};
use engine_core::{error::SourceError, retry::RetryDisposition};
use tokio_postgres::{Error as PgError, error::SqlState};

pub fn classify_source_error(err: &SourceError) -> RetryDisposition {
    match err {
        SourceError::Database(db_err) => classify_db_error(db_err),
        SourceError::Connector(conn_err) => classify_connector_error(conn_err),
    }
}

pub fn classify_db_error(err: &DbError) -> RetryDisposition {
    match err {
        DbError::Postgres(pg_err) => classify_pg_error(pg_err),
        DbError::Decode(_) => RetryDisposition::Stop,
    }
}

fn classify_connector_error(err: &ConnectorError) -> RetryDisposition {
    match err {
        ConnectorError::Connection(pg_err) => classify_pg_error(pg_err),
        ConnectorError::TlsConfig(_) => RetryDisposition::Stop,
        ConnectorError::InvalidUrl(_) => RetryDisposition::Stop,
        ConnectorError::UnsupportedScheme(_) => RetryDisposition::Stop,
    }
}

fn classify_pg_error(err: &PgError) -> RetryDisposition {
    if err.is_closed() {
        return RetryDisposition::Retry;
    }

    if let Some(code) = err.code()
        && is_retryable_pg_code(code)
    {
        return RetryDisposition::Retry;
    }

    RetryDisposition::Stop
}

fn is_retryable_pg_code(code: &SqlState) -> bool {
    matches!(
        *code,
        SqlState::T_R_SERIALIZATION_FAILURE
            | SqlState::T_R_DEADLOCK_DETECTED
            | SqlState::LOCK_NOT_AVAILABLE
            | SqlState::TOO_MANY_CONNECTIONS
            | SqlState::ADMIN_SHUTDOWN
            | SqlState::CRASH_SHUTDOWN
            | SqlState::CANNOT_CONNECT_NOW
            | SqlState::CONNECTION_FAILURE
            | SqlState::CONNECTION_DOES_NOT_EXIST
            | SqlState::SQLCLIENT_UNABLE_TO_ESTABLISH_SQLCONNECTION
            | SqlState::SQLSERVER_REJECTED_ESTABLISHMENT_OF_SQLCONNECTION
            | SqlState::CONNECTION_EXCEPTION
            | SqlState::QUERY_CANCELED
            | SqlState::OPERATOR_INTERVENTION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_and_config_errors_are_fatal() {
        assert_eq!(
            classify_source_error(&SourceError::Database(DbError::Decode("bad".into()))),
            RetryDisposition::Stop
        );
        assert_eq!(
            classify_source_error(&SourceError::Connector(ConnectorError::InvalidUrl(
                "nope".into()
            ))),
            RetryDisposition::Stop
        );
    }

    #[test]
    fn tls_setup_errors_are_not_retried() {
        let tls_err = native_tls::Certificate::from_pem(b"not a certificate").err().expect("invalid PEM must fail to parse");
        assert_eq!(
            classify_source_error(&SourceError::Connector(ConnectorError::TlsConfig(tls_err))),
            RetryDisposition::Stop
        );
    }
}
