// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// The error kinds a user can actually run into. Every message is
// written so the presentation layer can show it verbatim.
//
//   ModelUnavailable   — fatal, raised once at startup
//   MissingColumn      — table upload rejected, old results stay
//   UnreadableDocument — PDF/workbook could not be parsed
//   UnsupportedFormat  — extension is not csv/xlsx/xls
//   MalformedTable     — CSV syntax problem in a row
//   Recognition        — the model failed on a specific text
//
// Empty input is deliberately NOT an error: an empty abstract
// produces an empty record.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NerError {
    #[error("NER model unavailable at '{}': {reason}", path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("The uploaded file does not contain an '{0}' column.")]
    MissingColumn(String),

    #[error("Could not read the uploaded document: {0}")]
    UnreadableDocument(String),

    #[error("Unsupported file type '{0}' (expected .csv or .xlsx)")]
    UnsupportedFormat(String),

    #[error("Malformed table: {0}")]
    MalformedTable(String),

    #[error("Entity recognition failed: {0}")]
    Recognition(String),
}

impl NerError {
    pub fn model_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        NerError::ModelUnavailable {
            path:   path.into(),
            reason: reason.to_string(),
        }
    }
}
