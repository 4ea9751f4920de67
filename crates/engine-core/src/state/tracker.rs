use crate::{error::StateStoreError, state::WatermarkStore};
use chrono::{DateTime, Duration, Utc};
use model::records::watermark::{Watermark, WatermarkKey};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reads and writes the single sync watermark.
///
/// Reads never fail: a missing entry or an unreachable store falls back to
/// `now - lookback`. Writes are best-effort; a failed write is logged and the
/// next cycle simply re-reads from the older watermark.
#[derive(Clone)]
pub struct WatermarkTracker {
    store: Option<Arc<dyn WatermarkStore>>,
    key: WatermarkKey,
    lookback: Duration,
}

impl WatermarkTracker {
    pub fn new(store: Arc<dyn WatermarkStore>, key: WatermarkKey, lookback: Duration) -> Self {
        Self {
            store: Some(store),
            key,
            lookback,
        }
    }

    /// A tracker with no backing store. Every read yields the lookback
    /// default and every write is dropped with a warning.
    pub fn detached(key: WatermarkKey, lookback: Duration) -> Self {
        Self {
            store: None,
            key,
            lookback,
        }
    }

    pub fn key(&self) -> &WatermarkKey {
        &self.key
    }

    pub fn lookback(&self) -> Duration {
        self.lookback
    }

    pub fn is_detached(&self) -> bool {
        self.store.is_none()
    }

    /// The persisted watermark, if any. Store errors read as `None`.
    pub async fn current(&self) -> Option<Watermark> {
        let store = self.store.as_ref()?;
        match store.load(&self.key).await {
            Ok(wm) => wm,
            Err(err) => {
                warn!(key = %self.key, %err, "Failed to read watermark, using default");
                None
            }
        }
    }

    pub async fn get(&self) -> Watermark {
        self.get_at(Utc::now()).await
    }

    pub async fn get_at(&self, now: DateTime<Utc>) -> Watermark {
        match self.current().await {
            Some(wm) => wm,
            None => {
                let fallback = Watermark::lookback(now, self.lookback);
                debug!(key = %self.key, watermark = %fallback, "No watermark stored, using lookback");
                fallback
            }
        }
    }

    /// Persists `watermark`. Returns `true` only if the stored value moved.
    pub async fn set(&self, watermark: Watermark) -> bool {
        let Some(store) = self.store.as_ref() else {
            warn!(key = %self.key, %watermark, "Watermark store unavailable, not persisting");
            return false;
        };

        match store.save(&self.key, watermark).await {
            Ok(true) => {
                info!(key = %self.key, %watermark, "Watermark advanced");
                true
            }
            Ok(false) => {
                debug!(key = %self.key, %watermark, "Stored watermark already at or past candidate");
                false
            }
            Err(err) => {
                warn!(key = %self.key, %watermark, %err, "Failed to persist watermark");
                false
            }
        }
    }

    /// Operator override. Unlike [`set`](Self::set) this may move the
    /// watermark backward, and errors are returned to the caller.
    pub async fn reset(&self, watermark: Option<Watermark>) -> Result<(), StateStoreError> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| StateStoreError::Unavailable("no watermark store configured".into()))?;
        store.reset(&self.key, watermark).await
    }

    /// Writes `candidate` only if it is strictly newer than `previous`, or
    /// nothing was persisted before.
    pub async fn advance(&self, previous: Option<Watermark>, candidate: Watermark) -> bool {
        match previous {
            Some(prev) if prev >= candidate => {
                debug!(
                    key = %self.key,
                    previous = %prev,
                    %candidate,
                    "Candidate watermark not newer, leaving it unchanged"
                );
                false
            }
            _ => self.set(candidate).await,
        }
    }
}
