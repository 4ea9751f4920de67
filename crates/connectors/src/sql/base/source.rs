use crate::sql::base::{adapter::SqlAdapter, error::DbError, query::QueryGenerator};
use chrono::{DateTime, Utc};
use model::{
    core::{time, value::Value},
    pagination::offset::PageRequest,
    records::row::RowData,
};
use tracing::debug;

/// The telemetry table read through a SQL adapter.
#[derive(Clone)]
pub struct TelemetryTable<A: SqlAdapter> {
    adapter: A,
    table: String,
}

impl<A: SqlAdapter> TelemetryTable<A> {
    pub fn new(adapter: A, table: impl Into<String>) -> Self {
        Self {
            adapter,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn count(&self) -> Result<u64, DbError> {
        let sql = QueryGenerator::new(self.adapter.dialect()).count(&self.table);
        debug!(%sql, "Counting source rows");
        self.adapter.query_count(&sql).await
    }

    pub async fn fetch_since(&self, since: DateTime<Utc>) -> Result<Vec<RowData>, DbError> {
        let sql = QueryGenerator::new(self.adapter.dialect()).select_since(&self.table);
        let bound = time::format_micros(&since);
        debug!(%sql, since = %bound, "Fetching incremental rows");
        self.adapter
            .query_rows(&sql, &self.table, vec![Value::String(bound)])
            .await
    }

    pub async fn fetch_page(&self, page: PageRequest) -> Result<Vec<RowData>, DbError> {
        let sql = QueryGenerator::new(self.adapter.dialect()).select_page(&self.table, page);
        debug!(%sql, "Fetching page");
        self.adapter.query_rows(&sql, &self.table, Vec::new()).await
    }
}
