use crate::error::StateStoreError;
use async_trait::async_trait;
use model::records::watermark::{Watermark, WatermarkKey};

pub mod memory;
pub mod models;
pub mod sled_store;
pub mod tracker;

/// Backing storage for the sync watermark.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    async fn load(&self, key: &WatermarkKey) -> Result<Option<Watermark>, StateStoreError>;

    /// Stores `watermark` unless the persisted value is already at or past
    /// it. Returns whether the value was written.
    async fn save(&self, key: &WatermarkKey, watermark: Watermark)
    -> Result<bool, StateStoreError>;

    /// Unconditionally replaces (or removes, on `None`) the persisted value.
    async fn reset(
        &self,
        key: &WatermarkKey,
        watermark: Option<Watermark>,
    ) -> Result<(), StateStoreError>;
}
