use async_trait::async_trait;
use engine_config::settings::database::DatabaseSettings;
use engine_core::{
    connectors::source::{self, TelemetrySource},
    error::SourceError,
};
use std::sync::Arc;
use tracing::debug;

/// Opens the telemetry source for a sync cycle.
#[async_trait]
pub trait SourceFactory: Send + Sync {
    async fn connect(
        &self,
        database: &DatabaseSettings,
        table: &str,
    ) -> Result<Arc<dyn TelemetrySource>, SourceError>;
}

/// Opens a fresh Postgres connection per cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresSourceFactory;

#[async_trait]
impl SourceFactory for PostgresSourceFactory {
    async fn connect(
        &self,
        database: &DatabaseSettings,
        table: &str,
    ) -> Result<Arc<dyn TelemetrySource>, SourceError> {
        debug!(db = %database.display_target(), table, "Connecting to source");
        source::connect(&database.connection_string(), table).await
    }
}
