use crate::error::SinkError;
use async_trait::async_trait;
use model::records::batch::Batch;
use tracing::error;

pub mod http;

#[async_trait]
pub trait Sink: Send + Sync {
    /// Delivers one batch. A single attempt; no internal retry.
    async fn write_batch(&self, batch: &Batch) -> Result<(), SinkError>;

    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Delivers one batch and reports success. Failures are logged here and
    /// never propagated; retry policy belongs to the caller.
    async fn publish(&self, batch: &Batch) -> bool {
        match self.write_batch(batch).await {
            Ok(()) => true,
            Err(SinkError::Status { status, body }) => {
                error!(sink = self.name(), status, %body, records = batch.len(), "Sink rejected batch");
                false
            }
            Err(err) => {
                error!(sink = self.name(), %err, records = batch.len(), "Failed to deliver batch");
                false
            }
        }
    }
}
