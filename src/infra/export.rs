// ============================================================
// Layer 6 — CSV Exporter
// ============================================================
// Writes batch results and entity counts to CSV files that open
// directly in a spreadsheet.
//
// Files written into the output directory:
//   abstracts_and_entities.csv     — tabular batches, one row per record
//     No.,Title,Abstract,Seaweed Entities,Location Entities
//   pdf_entities.csv               — PDF uploads
//     Title,Abstract,Full Text,Seaweed Entities,Location Entities
//   detailed_seaweed_entities.csv  — Entity,Count (highest first)
//   detailed_location_entities.csv — Entity,Count (highest first)
//   entity_overview.csv            — Entity Type,Unique Entities,Total Occurrences
//
// The Abstract column holds the annotated (marked-up) abstract.
// Quoting of commas, quotes and newlines is left to the csv crate.

use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::PathBuf,
};

use crate::domain::counts::{CategoryOverview, EntityCounts};
use crate::domain::mention::Category;
use crate::domain::record::{ResultSet, SourceKind};

pub const BATCH_FILE:    &str = "abstracts_and_entities.csv";
pub const PDF_FILE:      &str = "pdf_entities.csv";
pub const OVERVIEW_FILE: &str = "entity_overview.csv";

/// File name of the detailed counts export for a category
pub fn detailed_file(category: Category) -> String {
    format!("detailed_{}_entities.csv", category.label().to_lowercase())
}

// ─── Writers (any io::Write) ──────────────────────────────────────────────────

/// One row per record of a tabular batch
pub fn write_batch<W: Write>(out: W, results: &ResultSet) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["No.", "Title", "Abstract", "Seaweed Entities", "Location Entities"])?;

    for r in results.records() {
        w.write_record([
            r.sequence_no.to_string(),
            r.title.clone().unwrap_or_default(),
            r.annotated_abstract.clone(),
            r.summary.seaweed.summary_line(),
            r.summary.location.summary_line(),
        ])?;
    }

    w.flush()?;
    Ok(())
}

/// PDF layout: raw abstract and full text. The entity columns
/// hold the abstract's counts, like the batch export does.
pub fn write_pdf<W: Write>(out: W, results: &ResultSet) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["Title", "Abstract", "Full Text", "Seaweed Entities", "Location Entities"])?;

    for r in results.records() {
        let (full_text, counts) = match &r.full_text {
            Some(f) => (f.raw.as_str(), &f.abstract_summary),
            None    => ("", &r.summary),
        };
        w.write_record([
            r.title.as_deref().unwrap_or_default(),
            r.raw_abstract.as_str(),
            full_text,
            counts.seaweed.summary_line().as_str(),
            counts.location.summary_line().as_str(),
        ])?;
    }

    w.flush()?;
    Ok(())
}

/// Entity,Count rows, highest count first
pub fn write_detailed<W: Write>(out: W, counts: &EntityCounts) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["Entity", "Count"])?;
    for (entity, count) in counts.ranked() {
        w.write_record([entity, count.to_string()])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_overview<W: Write>(out: W, overview: &[CategoryOverview]) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["Entity Type", "Unique Entities", "Total Occurrences"])?;
    for row in overview {
        w.write_record([
            row.category.label().to_string(),
            row.unique_entities.to_string(),
            row.total_occurrences.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

// ─── CsvExporter (files on disk) ──────────────────────────────────────────────

/// Writes every export for a batch into one directory
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    /// Create the exporter, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write all exports for `results`. Returns the files written.
    pub fn export_all(&self, kind: SourceKind, results: &ResultSet) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        let main = match kind {
            SourceKind::Tabular => self.write_file(BATCH_FILE, |f| write_batch(f, results))?,
            SourceKind::Pdf     => self.write_file(PDF_FILE, |f| write_pdf(f, results))?,
        };
        written.push(main);

        for category in Category::counted() {
            let counts = results.totals().for_category(category);
            written.push(self.write_file(&detailed_file(category), |f| write_detailed(f, &counts))?);
        }

        let overview = results.totals().overview();
        written.push(self.write_file(OVERVIEW_FILE, |f| write_overview(f, &overview))?);

        tracing::info!("Wrote {} CSV files to '{}'", written.len(), self.dir.display());
        Ok(written)
    }

    fn write_file<F>(&self, name: &str, write: F) -> Result<PathBuf>
    where
        F: FnOnce(fs::File) -> Result<()>,
    {
        let path = self.dir.join(name);
        let file = fs::File::create(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        write(file).with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Exported '{}'", path.display());
        Ok(path)
    }
}
