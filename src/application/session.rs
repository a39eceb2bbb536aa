// ============================================================
// Layer 2 — Session
// ============================================================
// One user's working state: the current batch, the page cursor,
// the active input modality and the last error to display.
//
// A Session is an explicit object handed to whoever drives it
// (the CLI here, a UI connection elsewhere). There is no global
// state; two sessions never see each other's results.
//
// Upload rules:
//   - switching between tabular and PDF input clears everything,
//     nothing is carried across modalities
//   - a batch is swapped in only once fully built; on any error
//     the previous results stay and `last_error` is set
//   - a successful upload clears `last_error`

use crate::application::annotator::Annotator;
use crate::data::{pdf::parse_pdf, tabular::parse_tabular};
use crate::domain::counts::{AggregateCounters, CategoryOverview};
use crate::domain::error::NerError;
use crate::domain::mention::Category;
use crate::domain::record::{ResultSet, SourceKind};
use crate::domain::store::{Page, ResultStore};

pub struct Session {
    annotator:  Annotator,
    store:      ResultStore,
    source:     Option<SourceKind>,
    last_error: Option<String>,
}

impl Session {
    pub fn new(annotator: Annotator, page_size: usize) -> Self {
        Self {
            annotator,
            store:      ResultStore::new(page_size),
            source:     None,
            last_error: None,
        }
    }

    // ─── Input ────────────────────────────────────────────────────────────────

    /// Switch input modality. Changing kind drops all results.
    pub fn select_source(&mut self, kind: SourceKind) {
        if self.source != Some(kind) {
            if self.source.is_some() {
                tracing::info!("Input switched to {:?}, clearing results", kind);
            }
            self.store.clear();
            self.last_error = None;
            self.source     = Some(kind);
        }
    }

    pub fn source(&self) -> Option<SourceKind> {
        self.source
    }

    /// Upload a CSV/XLSX table. Returns the number of records.
    pub fn upload_table(&mut self, bytes: &[u8], extension: &str) -> Result<usize, NerError> {
        self.select_source(SourceKind::Tabular);
        let annotator = &self.annotator;
        let result = parse_tabular(bytes, extension).and_then(|rows| annotator.annotate_rows(&rows));
        self.commit(result)
    }

    /// Upload a PDF paper. Returns the number of records (always 1).
    pub fn upload_pdf(&mut self, bytes: &[u8]) -> Result<usize, NerError> {
        self.select_source(SourceKind::Pdf);
        let annotator = &self.annotator;
        let result = parse_pdf(bytes).and_then(|doc| annotator.annotate_pdf(&doc));
        self.commit(result)
    }

    fn commit(&mut self, result: Result<ResultSet, NerError>) -> Result<usize, NerError> {
        match result {
            Ok(results) => {
                let n = results.len();
                self.store.replace(results);
                self.last_error = None;
                Ok(n)
            }
            Err(e) => {
                tracing::warn!("Upload rejected: {e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Message of the most recent failed upload, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ─── Paging ───────────────────────────────────────────────────────────────

    /// Jump to page `n` (0-based, clamped) and return it
    pub fn get_page(&mut self, n: i64) -> Page<'_> {
        self.store.seek(n);
        self.store.current_page()
    }

    pub fn current_page(&self) -> Page<'_> {
        self.store.current_page()
    }

    pub fn next_page(&mut self) -> Page<'_> {
        self.store.next_page();
        self.store.current_page()
    }

    pub fn previous_page(&mut self) -> Page<'_> {
        self.store.previous_page();
        self.store.current_page()
    }

    // ─── Counts ───────────────────────────────────────────────────────────────

    pub fn results(&self) -> &ResultSet {
        self.store.results()
    }

    pub fn get_totals(&self) -> &AggregateCounters {
        self.store.totals()
    }

    /// Entity → count for one category, highest count first
    pub fn get_detailed_counts(&self, category: Category) -> Vec<(String, usize)> {
        self.store.totals().for_category(category).ranked()
    }

    pub fn top_entities(&self, category: Category, n: usize) -> Vec<(String, usize)> {
        self.store.totals().for_category(category).top(n)
    }

    pub fn overview(&self) -> Vec<CategoryOverview> {
        self.store.totals().overview()
    }
}
