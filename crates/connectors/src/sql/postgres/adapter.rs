use crate::sql::{
    base::{
        adapter::{DatabaseKind, SqlAdapter},
        dialect::{self, Dialect},
        error::{ConnectorError, DbError},
    },
    postgres::{params::PgParamStore, row::to_row_data, utils::connect_client},
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

/// Naive `timestamp` columns are read and compared as UTC.
const SESSION_SETUP_SQL: &str = "SET TIME ZONE 'UTC'";

#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<RwLock<Client>>,
    dialect: dialect::Postgres,
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    async fn connect(url: &str) -> Result<Self, ConnectorError> {
        if let DatabaseKind::Other(scheme) = DatabaseKind::from_url(url) {
            return Err(ConnectorError::UnsupportedScheme(scheme));
        }

        let client = connect_client(url).await?;
        client.batch_execute(SESSION_SETUP_SQL).await?;
        debug!("Connected to PostgreSQL source");

        Ok(PgAdapter {
            client: Arc::new(RwLock::new(client)),
            dialect: dialect::Postgres,
        })
    }

    async fn query_rows(
        &self,
        sql: &str,
        entity: &str,
        params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError> {
        let bindings = PgParamStore::from_values(params);
        let client = self.client.read().await;
        let rows = client.query(sql, &bindings.as_refs()).await?;
        let result = rows.iter().map(|row| to_row_data(row, entity)).collect();
        Ok(result)
    }

    async fn query_count(&self, sql: &str) -> Result<u64, DbError> {
        let client = self.client.read().await;
        let row = client.query_one(sql, &[]).await?;
        let count: i64 = row.try_get(0)?;
        u64::try_from(count).map_err(|_| DbError::Decode(format!("negative row count {count}")))
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }
}
