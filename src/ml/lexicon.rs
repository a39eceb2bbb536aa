// ============================================================
// Layer 5 — Lexicon Entity Recognizer
// ============================================================
// A rule-based recognizer built from curated term lists, in the
// spirit of an entity-ruler component. Useful when no trained
// checkpoint is at hand, and as a deterministic stand-in in tests.
//
// Lexicon file format (JSON):
//   {
//     "SEAWEED":  ["Ulva", "Ulva lactuca", "Eucheuma cottonii"],
//     "LOCATION": ["Bali", "Nusa Penida"]
//   }
//
// Matching rules:
//   - case-insensitive: "bali" and "BALI" both match "Bali"
//   - whole words: "Bali" does not match inside "Balinese"
//   - within one category the longest term wins at a position
//   - different categories are matched independently, so their
//     spans may overlap (the highlighter resolves that)

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::domain::error::NerError;
use crate::domain::mention::{Category, Mention};
use crate::domain::traits::EntityRecognizer;

pub struct LexiconRecognizer {
    patterns: Vec<(Category, Regex)>,
}

impl LexiconRecognizer {
    /// Build from (category, terms) pairs. Blank terms are ignored.
    pub fn new<I, T>(lexicon: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (Category, Vec<T>)>,
        T: AsRef<str>,
    {
        // Merge lists that map to the same category (e.g. several
        // unknown labels all collapse to Other)
        let mut by_category: BTreeMap<Category, Vec<String>> = BTreeMap::new();
        for (category, terms) in lexicon {
            by_category.entry(category).or_default().extend(
                terms
                    .iter()
                    .map(|t| t.as_ref().trim().to_string())
                    .filter(|t| !t.is_empty()),
            );
        }

        let mut patterns = Vec::new();
        for (category, mut terms) in by_category {
            if terms.is_empty() {
                continue;
            }
            // Longest first so the alternation prefers the longest match
            terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
            terms.dedup();

            let alternation = terms
                .iter()
                .map(|t| term_pattern(t))
                .collect::<Vec<_>>()
                .join("|");
            let regex = RegexBuilder::new(&format!("(?:{alternation})"))
                .case_insensitive(true)
                .build()?;
            tracing::debug!("Lexicon: {} {} terms", terms.len(), category);
            patterns.push((category, regex));
        }

        Ok(Self { patterns })
    }

    /// Parse a JSON lexicon. Keys are labels; unknown labels map to Other.
    pub fn from_json(json: &str) -> Result<Self, NerError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| NerError::model_unavailable("<lexicon>", e))?;
        Self::new(raw.into_iter().map(|(label, terms)| (Category::from_label(&label), terms)))
            .map_err(|e| NerError::model_unavailable("<lexicon>", e))
    }

    /// Load a JSON lexicon file
    pub fn from_file(path: &Path) -> Result<Self, NerError> {
        let json = fs::read_to_string(path).map_err(|e| NerError::model_unavailable(path, e))?;
        let recognizer = Self::from_json(&json).map_err(|e| match e {
            NerError::ModelUnavailable { reason, .. } => NerError::model_unavailable(path, reason),
            other => other,
        })?;
        tracing::info!("Lexicon loaded from '{}'", path.display());
        Ok(recognizer)
    }
}

/// Escaped term with word boundaries on the sides that start or
/// end with a word character ("sp." must not require a boundary
/// after the dot)
fn term_pattern(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead  = if term.chars().next().is_some_and(is_word) { r"\b" } else { "" };
    let trail = if term.chars().last().is_some_and(is_word) { r"\b" } else { "" };
    format!("{lead}{}{trail}", regex::escape(term))
}

impl EntityRecognizer for LexiconRecognizer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn recognize(&self, text: &str) -> Result<Vec<Mention>, NerError> {
        // Byte ranges first, converted to char offsets in one pass below
        let mut hits: Vec<(usize, usize, Category)> = self
            .patterns
            .iter()
            .flat_map(|(category, regex)| {
                regex.find_iter(text).map(move |m| (m.start(), m.end(), *category))
            })
            .collect();
        hits.sort_by_key(|&(start, end, category)| (start, end, category));

        // Starts are sorted, so a single forward cursor is enough
        let mut mentions = Vec::with_capacity(hits.len());
        let mut byte_pos = 0usize;
        let mut char_pos = 0usize;

        for (start, end, category) in hits {
            char_pos += text[byte_pos..start].chars().count();
            byte_pos  = start;
            let end_char = char_pos + text[start..end].chars().count();
            mentions.push(Mention::new(category, &text[start..end], char_pos, end_char));
        }

        Ok(mentions)
    }
}
