use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    cycles: AtomicU64,
    records_published: AtomicU64,
    batches_published: AtomicU64,
    publish_failures: AtomicU64,
    retry_count: AtomicU64,
}

/// Process-wide counters shared by every sync cycle.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub cycles: u64,
    pub records_published: u64,
    pub batches_published: u64,
    pub publish_failures: u64,
    pub retry_count: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_cycles(&self) {
        self.inner.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_published(&self, records: u64) {
        self.inner
            .records_published
            .fetch_add(records, Ordering::Relaxed);
        self.inner.batches_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failures(&self) {
        self.inner.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_retries(&self, count: u64) {
        self.inner.retry_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles: self.inner.cycles.load(Ordering::Relaxed),
            records_published: self.inner.records_published.load(Ordering::Relaxed),
            batches_published: self.inner.batches_published.load(Ordering::Relaxed),
            publish_failures: self.inner.publish_failures.load(Ordering::Relaxed),
            retry_count: self.inner.retry_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
