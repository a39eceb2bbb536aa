// ============================================================
// Layer 2 — Annotate Use Case
// ============================================================
// The batch workflow behind the `annotate` and `entities`
// commands:
//
//   1. Load the recognizer (once; failure aborts)
//   2. Read the input file, route it by extension
//        .pdf              → Session::upload_pdf
//        .csv/.xlsx/.xls   → Session::upload_table
//   3. Write the CSV exports, if an output directory is set
//
// The Session is exposed afterwards so the caller can page
// through results and query counts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::{annotator::Annotator, session::Session};
use crate::domain::store::DEFAULT_PAGE_SIZE;
use crate::infra::export::CsvExporter;
use crate::ml::{load_recognizer, RecognizerSource};

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// The uploaded file (.csv, .xlsx, .xls or .pdf)
    pub input: PathBuf,

    /// Where CSV exports go; `None` skips exporting
    pub output_dir: Option<PathBuf>,

    pub recognizer: RecognizerSource,

    /// Records per results page
    pub page_size: usize,

    /// Entities shown per category in the rankings
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input:      PathBuf::from("abstracts.csv"),
            output_dir: Some(PathBuf::from("out")),
            recognizer: RecognizerSource::default(),
            page_size:  DEFAULT_PAGE_SIZE,
            top_n:      10,
        }
    }
}

pub struct AnnotateUseCase {
    config:  PipelineConfig,
    session: Session,
}

impl AnnotateUseCase {
    /// Load the recognizer and open a fresh session
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let recognizer = load_recognizer(&config.recognizer)?;
        let session    = Session::new(Annotator::new(recognizer), config.page_size.max(1));
        Ok(Self { config, session })
    }

    /// Run the upload and exports. Returns the files written.
    pub fn execute(&mut self) -> Result<Vec<PathBuf>> {
        let path  = self.config.input.clone();
        let bytes = fs::read(&path)
            .with_context(|| format!("Cannot read input file '{}'", path.display()))?;

        let ext = extension_of(&path);
        let n = if ext == "pdf" {
            self.session.upload_pdf(&bytes)?
        } else {
            self.session.upload_table(&bytes, &ext)?
        };
        if self.session.results().is_empty() {
            tracing::warn!("'{}' contains no records", path.display());
        } else {
            tracing::info!("'{}' produced {} records", path.display(), n);
        }

        let Some(dir) = &self.config.output_dir else {
            return Ok(Vec::new());
        };
        let Some(kind) = self.session.source() else {
            return Ok(Vec::new());
        };
        CsvExporter::new(dir)?.export_all(kind, self.session.results())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

/// Lower-cased extension without the dot ("" if there is none)
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::NerError;
    use crate::domain::mention::Category;

    fn setup(csv: &str) -> (tempfile::TempDir, PipelineConfig) {
        let dir = tempfile::tempdir().unwrap();
        let lexicon = dir.path().join("lexicon.json");
        fs::write(&lexicon, r#"{"SEAWEED": ["Ulva"], "LOCATION": ["Bali"]}"#).unwrap();
        let input = dir.path().join("abstracts.CSV");
        fs::write(&input, csv).unwrap();

        let config = PipelineConfig {
            input,
            output_dir: Some(dir.path().join("out")),
            recognizer: RecognizerSource::Lexicon(lexicon),
            ..PipelineConfig::default()
        };
        (dir, config)
    }

    #[test]
    fn test_runs_pipeline_and_exports() {
        let (dir, config) = setup("Title,Abstract\nA,Ulva grows in Bali and bali.\n");
        let mut uc = AnnotateUseCase::new(config).unwrap();
        let written = uc.execute().unwrap();

        assert_eq!(written.len(), 4);
        let location =
            fs::read_to_string(dir.path().join("out/detailed_location_entities.csv")).unwrap();
        assert_eq!(location, "Entity,Count\nbali,2\n");
        assert_eq!(
            uc.session().get_detailed_counts(Category::Seaweed),
            vec![("ulva".to_string(), 1)]
        );
    }

    #[test]
    fn test_no_output_dir_skips_export() {
        let (_dir, mut config) = setup("Abstract\nUlva\n");
        config.output_dir = None;
        let mut uc = AnnotateUseCase::new(config).unwrap();
        assert!(uc.execute().unwrap().is_empty());
        assert_eq!(uc.session().results().len(), 1);
    }

    #[test]
    fn test_missing_column_surfaces_domain_error() {
        let (_dir, config) = setup("Title\nA\n");
        let mut uc = AnnotateUseCase::new(config).unwrap();
        let err = uc.execute().unwrap_err();
        assert!(matches!(err.downcast_ref::<NerError>(), Some(NerError::MissingColumn(_))));
    }

    #[test]
    fn test_missing_recognizer_is_fatal() {
        let config = PipelineConfig {
            recognizer: RecognizerSource::Lexicon(PathBuf::from("/no/such/lexicon.json")),
            ..PipelineConfig::default()
        };
        let err = AnnotateUseCase::new(config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<NerError>(),
            Some(NerError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("paper.PDF")), "pdf");
        assert_eq!(extension_of(Path::new("noext")), "");
    }
}
