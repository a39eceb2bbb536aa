// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// pipeline works with. No file I/O, no model code, no CSV.
//
//   mention  — a recognised entity occurrence and its category
//   counts   — frequency maps with merge/sum semantics
//   record   — one annotated abstract, and a batch of them
//   store    — the current batch plus page navigation
//   error    — user-facing error kinds
//   traits   — the EntityRecognizer abstraction
//
// Everything here is unit-testable without a model on disk.

pub mod counts;
pub mod error;
pub mod mention;
pub mod record;
pub mod store;
pub mod traits;
