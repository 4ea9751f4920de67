use crate::error::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use connectors::sql::{
    base::{adapter::SqlAdapter, source::TelemetryTable},
    postgres::adapter::PgAdapter,
};
use model::{pagination::offset::PageRequest, records::row::RowData};
use std::sync::Arc;

/// Read side of a sync cycle.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Total number of rows in the source table.
    async fn count(&self) -> Result<u64, SourceError>;

    /// All rows with `enqueuedTime > since`, ascending, unbounded.
    async fn fetch_since(&self, since: DateTime<Utc>) -> Result<Vec<RowData>, SourceError>;

    /// One page of the whole table, ascending by `enqueuedTime`.
    async fn fetch_page(&self, page: PageRequest) -> Result<Vec<RowData>, SourceError>;

    fn name(&self) -> &str;
}

#[async_trait]
impl<A> TelemetrySource for TelemetryTable<A>
where
    A: SqlAdapter + 'static,
{
    async fn count(&self) -> Result<u64, SourceError> {
        Ok(TelemetryTable::count(self).await?)
    }

    async fn fetch_since(&self, since: DateTime<Utc>) -> Result<Vec<RowData>, SourceError> {
        Ok(TelemetryTable::fetch_since(self, since).await?)
    }

    async fn fetch_page(&self, page: PageRequest) -> Result<Vec<RowData>, SourceError> {
        Ok(TelemetryTable::fetch_page(self, page).await?)
    }

    fn name(&self) -> &str {
        self.table()
    }
}

/// Connects to the source database and binds the telemetry table.
pub async fn connect(url: &str, table: &str) -> Result<Arc<dyn TelemetrySource>, SourceError> {
    let adapter = PgAdapter::connect(url).await?;
    Ok(Arc::new(TelemetryTable::new(adapter, table)))
}
