// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the tokenizer that was saved next to the model weights.
// The recognizer must use the exact vocabulary the model was
// trained with, so there is no fallback: a missing or broken
// tokenizer.json makes the model unavailable.

use anyhow::Result;
use std::path::PathBuf;
use tokenizers::Tokenizer;

pub const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load tokenizer.json from the model directory
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join(TOKENIZER_FILE);
        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))?;
        tracing::debug!(
            "Tokenizer loaded ({} entries)",
            tokenizer.get_vocab_size(true)
        );
        Ok(tokenizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tokenizer() {
        let dir = tempfile::tempdir().unwrap();
        let err = TokenizerStore::new(dir.path()).load().unwrap_err();
        assert!(err.to_string().contains("tokenizer.json"));
    }

    #[test]
    fn test_loads_word_level_tokenizer() {
        // Minimal WordLevel tokenizer in HuggingFace JSON format
        let json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": { "[UNK]": 0, "ulva": 1, "bali": 2 },
                "unk_token": "[UNK]"
            }
        });
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOKENIZER_FILE), json.to_string()).unwrap();

        let tok = TokenizerStore::new(dir.path()).load().unwrap();
        let enc = tok.encode("ulva bali", false).unwrap();
        assert_eq!(enc.get_ids(), &[1, 2]);
    }
}
