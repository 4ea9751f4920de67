use crate::sql::base::{
    dialect::Dialect,
    error::{ConnectorError, DbError},
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseKind {
    Postgres,
    Other(String),
}

impl DatabaseKind {
    /// Infers the database kind from the URL scheme.
    pub fn from_url(url: &str) -> Self {
        let scheme = url.split_once("://").map(|(s, _)| s).unwrap_or_default();
        match scheme.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseKind::Postgres,
            // key=value connection strings are Postgres-only.
            "" if url.contains('=') => DatabaseKind::Postgres,
            other => DatabaseKind::Other(other.to_string()),
        }
    }
}

#[async_trait]
pub trait SqlAdapter: Send + Sync {
    async fn connect(url: &str) -> Result<Self, ConnectorError>
    where
        Self: Sized;

    /// Runs a query and decodes every row.
    async fn query_rows(
        &self,
        sql: &str,
        entity: &str,
        params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError>;

    /// Runs a query returning a single integer in the first column.
    async fn query_count(&self, sql: &str) -> Result<u64, DbError>;

    fn dialect(&self) -> &dyn Dialect;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_from_scheme() {
        assert_eq!(
            DatabaseKind::from_url("postgres://u:p@localhost/db"),
            DatabaseKind::Postgres
        );
        assert_eq!(
            DatabaseKind::from_url("host=localhost user=u dbname=db"),
            DatabaseKind::Postgres
        );
        assert_eq!(
            DatabaseKind::from_url("mysql://localhost/db"),
            DatabaseKind::Other("mysql".into())
        );
    }
}
