// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File formats and persistence shared by the other layers:
//
//   checkpoint.rs      — model manifest (ner_config.json) and
//                        burn CompactRecorder weights
//
//   tokenizer_store.rs — tokenizer.json saved next to the model
//
//   export.rs          — CSV exports of results and counts

/// Model manifest and weight loading
pub mod checkpoint;

/// Tokenizer loading
pub mod tokenizer_store;

/// CSV result exports
pub mod export;
