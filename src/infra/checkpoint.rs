// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Loads an externally trained NER model from a directory.
//
// Expected layout:
//   models/en_pipeline/
//     ner_config.json  ← architecture, label list, special tokens
//     tokenizer.json   ← HuggingFace tokenizer (see tokenizer_store)
//     model.mpk.gz     ← weights written by burn's CompactRecorder
//
// Example ner_config.json:
//   {
//     "vocab_size": 30522, "max_seq_len": 256, "d_model": 256,
//     "num_heads": 8, "num_layers": 6, "d_ff": 1024,
//     "labels": ["O", "B-SEAWEED", "I-SEAWEED", "B-LOCATION", "I-LOCATION"]
//   }
//
// Why a separate manifest?
//   The weights file only stores tensors. To rebuild the module
//   before loading them we need the exact architecture, and to
//   turn logits into entities we need the label order.

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::ml::model::{TransformerNerConfig, TransformerNerModel};

pub const MANIFEST_FILE: &str = "ner_config.json";
/// Weights file stem; the recorder appends ".mpk.gz"
pub const WEIGHTS_STEM: &str = "model";

fn default_cls_id() -> u32 { 101 }
fn default_sep_id() -> u32 { 102 }
fn default_overlap() -> usize { 32 }

/// Everything needed to rebuild the model and read its output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,

    /// Label names in logit order
    pub labels: Vec<String>,

    #[serde(default = "default_cls_id")]
    pub cls_id: u32,
    #[serde(default = "default_sep_id")]
    pub sep_id: u32,

    /// Tokens shared between consecutive windows on long inputs
    #[serde(default = "default_overlap")]
    pub window_overlap: usize,
}

impl ModelManifest {
    pub fn model_config(&self) -> TransformerNerConfig {
        TransformerNerConfig::new(
            self.vocab_size, self.max_seq_len, self.d_model,
            self.num_heads, self.num_layers, self.d_ff, self.labels.len(),
        )
    }

    /// Tokens per window once [CLS] and [SEP] are added
    pub fn window_tokens(&self) -> usize {
        self.max_seq_len.saturating_sub(2)
    }

    /// Reject manifests the recognizer could not run with
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            bail!("manifest lists no labels");
        }
        if self.window_tokens() == 0 {
            bail!("max_seq_len {} leaves no room for text tokens", self.max_seq_len);
        }
        if self.window_overlap >= self.window_tokens() {
            bail!(
                "window_overlap {} must be smaller than max_seq_len - 2 ({})",
                self.window_overlap,
                self.window_tokens()
            );
        }
        if self.num_heads == 0 || self.d_model % self.num_heads != 0 {
            bail!("d_model {} is not divisible by num_heads {}", self.d_model, self.num_heads);
        }
        Ok(())
    }
}

/// Reads a model directory. Nothing is written: checkpoints are
/// produced by the (external) training pipeline.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read and validate ner_config.json
    pub fn load_manifest(&self) -> Result<ModelManifest> {
        let path = self.dir.join(MANIFEST_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read model manifest '{}'", path.display()))?;

        let manifest: ModelManifest = serde_json::from_str(&json)
            .with_context(|| format!("Invalid model manifest '{}'", path.display()))?;
        manifest.validate()?;

        tracing::debug!(
            "Manifest: {} layers, d_model={}, {} labels",
            manifest.num_layers,
            manifest.d_model,
            manifest.labels.len()
        );
        Ok(manifest)
    }

    /// Load the saved weights into a freshly initialised model.
    /// The architecture must match the one the weights were saved from.
    pub fn load_model<B: Backend>(
        &self,
        model:  TransformerNerModel<B>,
        device: &B::Device,
    ) -> Result<TransformerNerModel<B>> {
        let path = self.dir.join(WEIGHTS_STEM);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load weights '{}.mpk.gz'", path.display()))?;

        tracing::info!("Loaded NER weights from '{}'", self.dir.display());
        Ok(model.load_record(record))
    }
}
