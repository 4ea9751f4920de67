use model::records::watermark::Watermark;

/// Outcome of a completed bulk load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkReport {
    /// Row count observed before paging started.
    pub total_rows: u64,
    pub records_published: usize,
    pub batches_published: usize,
    /// Watermark in effect after the load; `None` if nothing was ever
    /// persisted and nothing was published.
    pub watermark: Option<Watermark>,
}

impl BulkReport {
    pub fn empty_source() -> Self {
        Self::default()
    }

    pub fn skipped(&self) -> bool {
        self.total_rows == 0
    }
}
