use crate::{
    error::StateStoreError,
    state::{WatermarkStore, models::WatermarkEntry},
};
use async_trait::async_trait;
use model::records::watermark::{Watermark, WatermarkKey};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use std::path::Path;

pub struct SledWatermarkStore {
    db: sled::Db,
}

impl SledWatermarkStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateStoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Helper to generate consistent keys for watermark entries
    #[inline]
    fn wm_key(key: &WatermarkKey) -> String {
        format!("wm:{}:{}", key.partition, key.row)
    }
}

#[async_trait]
impl WatermarkStore for SledWatermarkStore {
    async fn load(&self, key: &WatermarkKey) -> Result<Option<Watermark>, StateStoreError> {
        match self.db.get(Self::wm_key(key))? {
            Some(bytes) => {
                let entry: WatermarkEntry = bincode::deserialize(&bytes)?;
                Ok(Some(entry.watermark()))
            }
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        key: &WatermarkKey,
        watermark: Watermark,
    ) -> Result<bool, StateStoreError> {
        let key = Self::wm_key(key);
        let new_bytes = bincode::serialize(&WatermarkEntry::new(watermark))?;

        // Check-then-set in one transaction so a slower, overlapping cycle
        // cannot move the watermark backward.
        let result = self.db.transaction::<_, _, StateStoreError>(|tx_db| {
            if let Some(existing_bytes) = tx_db.get(&key)? {
                let existing: WatermarkEntry = bincode::deserialize(&existing_bytes)
                    .map_err(|e| ConflictableTransactionError::Abort(e.into()))?;

                if existing.watermark() >= watermark {
                    return Ok(false);
                }
            }

            tx_db.insert(key.as_str(), new_bytes.as_slice())?;
            Ok(true)
        });

        let written = match result {
            Ok(written) => written,
            Err(TransactionError::Abort(e)) => return Err(e),
            Err(TransactionError::Storage(e)) => return Err(e.into()),
        };

        if written {
            self.db.flush_async().await?;
        }
        Ok(written)
    }

    async fn reset(
        &self,
        key: &WatermarkKey,
        watermark: Option<Watermark>,
    ) -> Result<(), StateStoreError> {
        let key = Self::wm_key(key);
        match watermark {
            Some(wm) => {
                let bytes = bincode::serialize(&WatermarkEntry::new(wm))?;
                self.db.insert(key, bytes)?;
            }
            None => {
                self.db.remove(key)?;
            }
        }
        self.db.flush_async().await?;
        Ok(())
    }
}
