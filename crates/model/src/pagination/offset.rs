use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 500;

/// One `LIMIT .. OFFSET ..` window over the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

/// Walks a table of known size page by page.
///
/// Iteration stops once a page comes back short or the known total is
/// exhausted, whichever happens first.
#[derive(Debug, Clone)]
pub struct OffsetPager {
    page_size: usize,
    total: usize,
    offset: usize,
    done: bool,
}

impl OffsetPager {
    pub fn new(total: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        OffsetPager {
            page_size,
            total,
            offset: 0,
            done: total == 0,
        }
    }

    pub fn next_request(&self) -> Option<PageRequest> {
        if self.done {
            return None;
        }

        Some(PageRequest {
            offset: self.offset,
            limit: self.page_size,
        })
    }

    /// Records how many rows the last requested page returned.
    pub fn advance(&mut self, returned: usize) {
        self.offset += returned;
        if returned < self.page_size || self.offset >= self.total {
            self.done = true;
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of page queries a full, uninterrupted walk issues.
    pub fn expected_pages(total: usize, page_size: usize) -> usize {
        total.div_ceil(page_size.max(1))
    }
}
