// ============================================================
// Layer 5 — Neural Entity Recognizer
// ============================================================
// Runs the trained token classifier over raw text and turns the
// per-token labels back into character-level mentions.
//
//   text
//     → tokenizer (with char offsets)
//     → token windows (data::chunker) of max_seq_len - 2 tokens
//     → [CLS] window [SEP] → model → argmax label per token
//     → BIO decoding → Mention { category, surface, start, end }
//
// The model is loaded once, at startup, and only read afterwards.

use std::path::Path;
use std::sync::Mutex;

use burn::prelude::*;
use tokenizers::Tokenizer;

use crate::data::chunker::Chunker;
use crate::domain::error::NerError;
use crate::domain::mention::{char_to_byte_offsets, Category, Mention};
use crate::domain::traits::EntityRecognizer;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::model::TransformerNerModel;

type InferBackend = burn::backend::Wgpu;

pub struct NeuralRecognizer {
    // burn modules are Send but not guaranteed Sync
    model:     Mutex<TransformerNerModel<InferBackend>>,
    tokenizer: Tokenizer,
    labels:    Vec<String>,
    chunker:   Chunker,
    cls_id:    u32,
    sep_id:    u32,
    device:    burn::backend::wgpu::WgpuDevice,
}

impl NeuralRecognizer {
    /// Load manifest, tokenizer and weights from `dir`.
    /// Any failure is reported as ModelUnavailable.
    pub fn load(dir: &Path) -> Result<Self, NerError> {
        let unavailable = |e: anyhow::Error| NerError::model_unavailable(dir, format!("{e:#}"));

        let ckpt      = CheckpointManager::new(dir);
        let manifest  = ckpt.load_manifest().map_err(unavailable)?;
        let tokenizer = TokenizerStore::new(dir).load().map_err(unavailable)?;

        let device = burn::backend::wgpu::WgpuDevice::default();
        let model: TransformerNerModel<InferBackend> = manifest.model_config().init(&device);
        let model  = ckpt.load_model(model, &device).map_err(unavailable)?;

        tracing::info!(
            "NER model ready: {} labels, window {} tokens",
            manifest.labels.len(),
            manifest.window_tokens()
        );

        Ok(Self {
            model:   Mutex::new(model),
            tokenizer,
            chunker: Chunker::new(manifest.window_tokens(), manifest.window_overlap),
            labels:  manifest.labels,
            cls_id:  manifest.cls_id,
            sep_id:  manifest.sep_id,
            device,
        })
    }

    /// Label index with the highest logit for every token of one window
    fn predict_window(&self, ids: &[u32]) -> Result<Vec<usize>, NerError> {
        let mut input_ids: Vec<i32> = Vec::with_capacity(ids.len() + 2);
        input_ids.push(self.cls_id as i32);
        input_ids.extend(ids.iter().map(|&id| id as i32));
        input_ids.push(self.sep_id as i32);

        let input = Tensor::<InferBackend, 1, Int>::from_ints(input_ids.as_slice(), &self.device)
            .unsqueeze::<2>();

        let logits = {
            let model = self
                .model
                .lock()
                .map_err(|_| NerError::Recognition("model lock poisoned".into()))?;
            model.forward(input)
        };

        let num_labels = self.labels.len();
        let flat: Vec<f32> = logits
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| NerError::Recognition(format!("cannot read logits: {e:?}")))?;

        // Row 0 is [CLS]; rows 1..=ids.len() are the window tokens
        Ok((1..=ids.len())
            .map(|row| argmax(&flat[row * num_labels..(row + 1) * num_labels]))
            .collect())
    }
}

impl EntityRecognizer for NeuralRecognizer {
    fn name(&self) -> &str {
        "neural"
    }

    fn recognize(&self, text: &str) -> Result<Vec<Mention>, NerError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let encoding = self
            .tokenizer
            .encode_char_offsets(text, false)
            .map_err(|e| NerError::Recognition(format!("tokenisation failed: {e}")))?;
        let ids     = encoding.get_ids();
        let offsets = encoding.get_offsets();

        let mut label_ids = vec![0usize; ids.len()];
        for window in self.chunker.windows(ids.len()) {
            let predicted = self.predict_window(&ids[window.span.clone()])?;
            for t in window.owned.clone() {
                label_ids[t] = predicted[t - window.span.start];
            }
        }

        let tags: Vec<Tag<'_>> = label_ids
            .iter()
            .map(|&i| Tag::parse(&self.labels[i]))
            .collect();

        let mentions = decode_bio(text, &tags, offsets);
        tracing::debug!("{} tokens → {} mentions", ids.len(), mentions.len());
        Ok(mentions)
    }
}

fn argmax(row: &[f32]) -> usize {
    row.iter()
        .enumerate()
        .fold((0usize, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

// ─── BIO decoding ─────────────────────────────────────────────────────────────

/// A token label split into its chunk role and entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag<'a> {
    Outside,
    Begin(&'a str),
    Inside(&'a str),
}

impl<'a> Tag<'a> {
    /// "O" → Outside, "B-X"/"U-X"/"S-X" → Begin(X),
    /// "I-X"/"L-X"/"E-X" → Inside(X), a bare "X" → Inside(X)
    pub fn parse(label: &'a str) -> Self {
        if label == "O" || label.is_empty() {
            return Tag::Outside;
        }
        match label.split_once('-') {
            Some(("B" | "U" | "S", kind)) => Tag::Begin(kind),
            Some(("I" | "L" | "E", kind)) => Tag::Inside(kind),
            _                             => Tag::Inside(label),
        }
    }
}

/// Merge consecutive tagged tokens into mentions.
/// `offsets` are (start, end) char offsets of each token in `text`.
pub fn decode_bio(text: &str, tags: &[Tag<'_>], offsets: &[(usize, usize)]) -> Vec<Mention> {
    let bytes        = char_to_byte_offsets(text);
    let text_chars   = bytes.len() - 1;
    let mut mentions = Vec::new();
    let mut current: Option<(&str, usize, usize)> = None;

    let flush = |span: Option<(&str, usize, usize)>, out: &mut Vec<Mention>| {
        if let Some((kind, start, end)) = span {
            if start < end && end <= text_chars {
                out.push(Mention::new(
                    Category::from_label(kind),
                    &text[bytes[start]..bytes[end]],
                    start,
                    end,
                ));
            }
        }
    };

    for (tag, &(start, end)) in tags.iter().zip(offsets) {
        match *tag {
            Tag::Outside => flush(current.take(), &mut mentions),
            Tag::Begin(kind) => {
                flush(current.take(), &mut mentions);
                current = Some((kind, start, end));
            }
            Tag::Inside(kind) => match current {
                Some((open, s, _)) if open == kind => current = Some((open, s, end)),
                _ => {
                    flush(current.take(), &mut mentions);
                    current = Some((kind, start, end));
                }
            },
        }
    }
    flush(current.take(), &mut mentions);

    mentions
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // "Ulva lactuca grows in Bali"
    //  0..4 5..12  13..18 19..21 22..26
    fn offsets() -> Vec<(usize, usize)> {
        vec![(0, 4), (5, 12), (13, 18), (19, 21), (22, 26)]
    }

    const TEXT: &str = "Ulva lactuca grows in Bali";

    #[test]
    fn test_tag_parse() {
        assert_eq!(Tag::parse("O"), Tag::Outside);
        assert_eq!(Tag::parse("B-SEAWEED"), Tag::Begin("SEAWEED"));
        assert_eq!(Tag::parse("I-LOCATION"), Tag::Inside("LOCATION"));
        assert_eq!(Tag::parse("U-LOCATION"), Tag::Begin("LOCATION"));
        assert_eq!(Tag::parse("SEAWEED"), Tag::Inside("SEAWEED"));
    }

    #[test]
    fn test_decode_multi_token_entity() {
        let tags = [
            Tag::Begin("SEAWEED"),
            Tag::Inside("SEAWEED"),
            Tag::Outside,
            Tag::Outside,
            Tag::Begin("LOCATION"),
        ];
        let m = decode_bio(TEXT, &tags, &offsets());
        assert_eq!(
            m,
            vec![
                Mention::new(Category::Seaweed, "Ulva lactuca", 0, 12),
                Mention::new(Category::Location, "Bali", 22, 26),
            ]
        );
    }

    #[test]
    fn test_inside_without_begin_starts_entity() {
        let tags = [
            Tag::Inside("SEAWEED"),
            Tag::Inside("LOCATION"),
            Tag::Outside,
            Tag::Outside,
            Tag::Inside("ORG"),
        ];
        let m = decode_bio(TEXT, &tags, &offsets());
        assert_eq!(m.len(), 3);
        assert_eq!(m[0].surface, "Ulva");
        assert_eq!(m[1].category, Category::Location);
        assert_eq!(m[2].category, Category::Other);
    }

    #[test]
    fn test_consecutive_begins_split() {
        let tags = [Tag::Begin("SEAWEED"), Tag::Begin("SEAWEED")];
        let m = decode_bio(TEXT, &tags, &offsets()[..2]);
        assert_eq!(m.len(), 2);
        assert_eq!(m[1].surface, "lactuca");
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_bio("", &[], &[]).is_empty());
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 2.0, -1.0]), 1);
        assert_eq!(argmax(&[3.0, 3.0]), 0);
    }
}
