//! Page envelope returned alongside fetched records.

use crate::{PageNumber, PageRequest, page_count};

/// One page of records plus the counters a client needs to render paging
/// controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    page: PageNumber,
    pages: u64,
    count: u64,
}

impl<T> Page<T> {
    /// Assemble a page from the fetched records and the total match count.
    #[must_use]
    pub fn new(request: &PageRequest, items: Vec<T>, count: u64) -> Self {
        Self {
            items,
            page: request.page(),
            pages: page_count(count, request.size()),
            count,
        }
    }

    /// Consume the envelope, returning the records.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Page number these records belong to.
    #[must_use]
    pub const fn page(&self) -> PageNumber {
        self.page
    }

    /// Total number of pages for the filter.
    #[must_use]
    pub const fn pages(&self) -> u64 {
        self.pages
    }

    /// Total number of records matching the filter.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }
}
