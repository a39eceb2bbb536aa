// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams of the pipeline. The application layer only ever
// talks to these traits, so the statistical model can be swapped
// for a lexicon (or a test double) without touching it.
//
//   EntityRecognizer
//     - NeuralRecognizer  → burn transformer + tokenizer (ml layer)
//     - LexiconRecognizer → curated term lists (ml layer)

use crate::domain::error::NerError;
use crate::domain::mention::Mention;

// ─── EntityRecognizer ─────────────────────────────────────────────────────────
/// Anything that can find entity mentions in raw text.
///
/// Contract:
///   - `recognize("")` returns an empty Vec, never an error
///   - every returned span satisfies 0 <= start < end <= chars(text)
///   - overlapping spans are allowed and passed through as-is
///   - implementations hold read-only state, so one instance can
///     be shared across the whole process
pub trait EntityRecognizer: Send + Sync {
    /// Short identifier used in log lines (e.g. "neural", "lexicon")
    fn name(&self) -> &str;

    /// Find all entity mentions in `text`, sorted by (start, end)
    fn recognize(&self, text: &str) -> Result<Vec<Mention>, NerError>;
}
