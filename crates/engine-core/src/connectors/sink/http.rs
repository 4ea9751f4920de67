use crate::{connectors::sink::Sink, error::SinkError};
use async_trait::async_trait;
use model::records::batch::Batch;
use tracing::debug;

/// Longest response body kept in a failure report.
const MAX_ERROR_BODY: usize = 512;

/// Posts each batch as a JSON array to a fixed ingestion endpoint.
#[derive(Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn write_batch(&self, batch: &Batch) -> Result<(), SinkError> {
        debug!(endpoint = %self.endpoint, records = batch.len(), "Posting batch");

        let response = self.client.post(&self.endpoint).json(batch).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Status {
            status: status.as_u16(),
            body: truncate(body, MAX_ERROR_BODY),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
