// ============================================================
// Layer 3 — Record and ResultSet
// ============================================================
// A Record is the annotated result for one input row (tabular
// upload) or one uploaded PDF. A ResultSet is the ordered list of
// Records from one upload plus the batch-wide counters.
//
// ResultSet invariant:
//   totals == sum of every record's summary, per category.
// It is enforced by construction: `ResultSet::new` derives the
// totals from the records, there is no way to set them directly.

use serde::{Deserialize, Serialize};

use crate::domain::counts::{AggregateCounters, EntitySummary};

/// Which kind of upload produced a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// CSV or spreadsheet with an "Abstract" column
    Tabular,
    /// A single PDF paper
    Pdf,
}

/// Full document text and its highlighted version (PDF uploads only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullText {
    pub raw:       String,
    pub annotated: String,

    /// Counts over the abstract alone, used by the PDF export;
    /// the record's own summary covers the full text
    pub abstract_summary: EntitySummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based position of the record within its batch
    pub sequence_no: usize,

    pub title: Option<String>,

    /// The abstract exactly as read from the source
    pub raw_abstract: String,

    /// The abstract with entity markers spliced in (display only)
    pub annotated_abstract: String,

    /// Per-category counts for this record
    pub summary: EntitySummary,

    /// Present for PDF uploads, where counting covers the whole paper
    pub full_text: Option<FullText>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    records: Vec<Record>,
    totals:  AggregateCounters,
}

impl ResultSet {
    /// Build a ResultSet, summing the per-record summaries into
    /// the batch totals
    pub fn new(records: Vec<Record>) -> Self {
        let totals = records.iter().map(|r| &r.summary).sum();
        Self { records, totals }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn totals(&self) -> &AggregateCounters {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
