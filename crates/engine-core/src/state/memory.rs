use crate::{error::StateStoreError, state::WatermarkStore};
use async_trait::async_trait;
use model::records::watermark::{Watermark, WatermarkKey};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store, used for dry runs and tests.
#[derive(Default)]
pub struct MemoryWatermarkStore {
    entries: RwLock<HashMap<WatermarkKey, Watermark>>,
}

impl MemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WatermarkStore for MemoryWatermarkStore {
    async fn load(&self, key: &WatermarkKey) -> Result<Option<Watermark>, StateStoreError> {
        Ok(self.entries.read().await.get(key).copied())
    }

    async fn save(
        &self,
        key: &WatermarkKey,
        watermark: Watermark,
    ) -> Result<bool, StateStoreError> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(existing) if *existing >= watermark => Ok(false),
            _ => {
                entries.insert(key.clone(), watermark);
                Ok(true)
            }
        }
    }

    async fn reset(
        &self,
        key: &WatermarkKey,
        watermark: Option<Watermark>,
    ) -> Result<(), StateStoreError> {
        let mut entries = self.entries.write().await;
        match watermark {
            Some(wm) => entries.insert(key.clone(), wm),
            None => entries.remove(key),
        };
        Ok(())
    }
}
