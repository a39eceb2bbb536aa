// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between an uploaded file and the annotated record:
//
//   .csv / .xlsx bytes          .pdf bytes
//       │                           │
//       ▼                           ▼
//   tabular::parse_tabular      pdf::parse_pdf
//       │                           │  (preprocessor cleans pages)
//       └────────── text ───────────┘
//                    │
//                    ▼
//         EntityRecognizer (ml layer, chunker windows long input)
//                    │ mentions
//          ┌─────────┴──────────┐
//          ▼                    ▼
//   aggregator::aggregate   highlighter::Highlighter
//      (counts)               (annotated text)
//
// Each module does one step and is tested on its own.

/// Case-folded per-category frequency counting
pub mod aggregator;

/// Overlapping token windows for long model inputs
pub mod chunker;

/// Offset-based entity markup
pub mod highlighter;

/// Title / abstract / full-text extraction from PDFs
pub mod pdf;

/// Line-level cleanup of extracted PDF page text
pub mod preprocessor;

/// (title, abstract) rows from CSV and spreadsheet uploads
pub mod tabular;
