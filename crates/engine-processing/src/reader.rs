use crate::{error::SyncError, retry::classify_source_error};
use chrono::{DateTime, Utc};
use engine_core::{
    connectors::source::TelemetrySource,
    error::SourceError,
    metrics::Metrics,
    retry::{RetryError, RetryPolicy},
};
use model::{pagination::offset::PageRequest, records::row::RowData};
use std::{future::Future, sync::Arc};

/// Handles data fetching from source with retry logic.
pub struct SnapshotReader {
    source: Arc<dyn TelemetrySource>,
    retry: RetryPolicy,
    metrics: Metrics,
}

impl SnapshotReader {
    pub fn new(source: Arc<dyn TelemetrySource>, retry: RetryPolicy, metrics: Metrics) -> Self {
        Self {
            source,
            retry,
            metrics,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn count(&self) -> Result<u64, SyncError> {
        let source = self.source.clone();
        self.with_retry(move || {
            let source = source.clone();
            async move { source.count().await }
        })
        .await
    }

    pub async fn fetch_since(&self, since: DateTime<Utc>) -> Result<Vec<RowData>, SyncError> {
        let source = self.source.clone();
        self.with_retry(move || {
            let source = source.clone();
            async move { source.fetch_since(since).await }
        })
        .await
    }

    pub async fn fetch_page(&self, page: PageRequest) -> Result<Vec<RowData>, SyncError> {
        let source = self.source.clone();
        self.with_retry(move || {
            let source = source.clone();
            async move { source.fetch_page(page).await }
        })
        .await
    }

    async fn with_retry<F, Fut, T>(&self, op: F) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        match self.retry.run(op, classify_source_error).await {
            Ok(done) => {
                if done.retries > 0 {
                    self.metrics.increment_retries(done.retries as u64);
                }
                Ok(done.value)
            }
            Err(RetryError::Fatal(e)) => Err(SyncError::Source(e)),
            Err(RetryError::AttemptsExceeded(e)) => {
                self.metrics.increment_retries(self.retry.max_attempts.saturating_sub(1) as u64);
                Err(SyncError::RetriesExhausted(e.to_string()))
            }
        }
    }
}
