// ============================================================
// Layer 5 — ML / Recognition Layer
// ============================================================
// All model-specific code lives here; burn and tokenizers are
// not imported anywhere else (apart from checkpoint loading in
// infra).
//
//   model.rs      — transformer encoder with a per-token label head
//   inferencer.rs — NeuralRecognizer: tokenise, window, predict,
//                   BIO-decode into mentions
//   lexicon.rs    — LexiconRecognizer: curated term lists
//
// The recognizer is built exactly once per process by
// `load_recognizer` and then shared read-only behind an Arc.
// A failure here is fatal: nothing else runs without it.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::error::NerError;
use crate::domain::traits::EntityRecognizer;

/// Transformer token-classification model
pub mod model;

/// Neural recognizer: checkpoint → mentions
pub mod inferencer;

/// Term-list recognizer
pub mod lexicon;

/// Where the process gets its recognizer from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognizerSource {
    /// Directory with ner_config.json, tokenizer.json, model.mpk.gz
    Model(PathBuf),
    /// JSON lexicon file
    Lexicon(PathBuf),
}

impl Default for RecognizerSource {
    fn default() -> Self {
        RecognizerSource::Model(PathBuf::from("models/en_pipeline"))
    }
}

/// Build the process-wide recognizer. Call once at startup.
pub fn load_recognizer(source: &RecognizerSource) -> Result<Arc<dyn EntityRecognizer>, NerError> {
    let recognizer: Arc<dyn EntityRecognizer> = match source {
        RecognizerSource::Model(dir) => {
            tracing::info!("Loading NER model from '{}'", dir.display());
            Arc::new(inferencer::NeuralRecognizer::load(dir)?)
        }
        RecognizerSource::Lexicon(path) => {
            Arc::new(lexicon::LexiconRecognizer::from_file(path)?)
        }
    };
    tracing::info!("Recognizer '{}' ready", recognizer.name());
    Ok(recognizer)
}
