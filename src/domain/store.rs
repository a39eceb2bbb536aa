// ============================================================
// Layer 3 — Result Store
// ============================================================
// Holds the ResultSet of the current batch and the page cursor
// the presentation layer navigates with.
//
// Paging example with 25 records and page_size 10:
//   page 0 → records 1..=10
//   page 1 → records 11..=20
//   page 2 → records 21..=25
//   page 7 → clamped to page 2, page -3 → clamped to page 0
//
// The store is replaced atomically: a new batch is only swapped
// in once it has been fully built, so a failed upload leaves the
// previous results on screen.

use crate::domain::counts::AggregateCounters;
use crate::domain::record::{Record, ResultSet};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One row of a page view
#[derive(Debug, Clone, PartialEq)]
pub struct PageRow<'a> {
    /// 1-based position within this page
    pub display_no: usize,
    pub record:     &'a Record,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// 0-based page index after clamping
    pub index:       usize,
    pub total_pages: usize,
    pub rows:        Vec<PageRow<'a>>,
}

#[derive(Debug)]
pub struct ResultStore {
    results:   ResultSet,
    page_size: usize,
    cursor:    usize,
}

impl ResultStore {
    /// # Panics
    /// Panics if `page_size` is zero
    pub fn new(page_size: usize) -> Self {
        assert!(page_size > 0, "page_size must be at least 1");
        Self {
            results: ResultSet::default(),
            page_size,
            cursor: 0,
        }
    }

    /// Swap in a new batch and reset the cursor to the first page
    pub fn replace(&mut self, results: ResultSet) {
        tracing::debug!("Result store replaced ({} records)", results.len());
        self.results = results;
        self.cursor  = 0;
    }

    /// Drop every stored result
    pub fn clear(&mut self) {
        self.replace(ResultSet::default());
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn totals(&self) -> &AggregateCounters {
        self.results.totals()
    }

    /// ceil(records / page_size); zero for an empty store
    pub fn total_pages(&self, page_size: usize) -> usize {
        let page_size = page_size.max(1);
        self.results.len().div_ceil(page_size)
    }

    /// A page of records. Out-of-range indices (including negative
    /// ones) are clamped into the valid range rather than rejected.
    pub fn page(&self, index: i64, page_size: usize) -> Page<'_> {
        let page_size   = page_size.max(1);
        let total_pages = self.total_pages(page_size);
        let last        = total_pages.saturating_sub(1);
        let index       = index.clamp(0, last as i64) as usize;

        let start = (index * page_size).min(self.results.len());
        let end   = (start + page_size).min(self.results.len());

        let rows = self.results.records()[start..end]
            .iter()
            .enumerate()
            .map(|(i, record)| PageRow { display_no: i + 1, record })
            .collect();

        Page { index, total_pages, rows }
    }

    /// The page the cursor points at
    pub fn current_page(&self) -> Page<'_> {
        self.page(self.cursor as i64, self.page_size)
    }

    /// Move the cursor to `index` (clamped) and return its position
    pub fn seek(&mut self, index: i64) -> usize {
        self.cursor = self.page(index, self.page_size).index;
        self.cursor
    }

    /// Advance one page; a no-op on the last page
    pub fn next_page(&mut self) -> usize {
        if self.cursor + 1 < self.total_pages(self.page_size) {
            self.cursor += 1;
        }
        self.cursor
    }

    /// Go back one page; a no-op on the first page
    pub fn previous_page(&mut self) -> usize {
        self.cursor = self.cursor.saturating_sub(1);
        self.cursor
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
