// ============================================================
// Layer 3 — Mention Domain Type
// ============================================================
// A Mention is one recognised occurrence of a named entity:
//   - which category it belongs to (SEAWEED, LOCATION, other)
//   - the surface text exactly as it appears in the source
//   - a half-open character span [start, end) into that source
//
// Offsets are counted in Unicode scalar values (Rust `char`s),
// NOT bytes, so "Île" has length 3 even though it is 4 bytes.
// Components that need to slice a &str convert with
// `char_to_byte_offsets` below.
//
// Example:
//   text:    "Ulva grows in Bali"
//   Mention { category: Seaweed,  surface: "Ulva", start: 0,  end: 4  }
//   Mention { category: Location, surface: "Bali", start: 14, end: 18 }

use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity classes the pipeline cares about.
/// Every label the recognizer emits that is not one of the two
/// domain categories collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Seaweed,
    Location,
    Other,
}

impl Category {
    /// Map a raw model/lexicon label onto a category.
    /// Matching is exact on the upper-case label, as the model emits it.
    pub fn from_label(label: &str) -> Self {
        match label {
            "SEAWEED"  => Category::Seaweed,
            "LOCATION" => Category::Location,
            _          => Category::Other,
        }
    }

    /// The label as shown to users and written to exports
    pub fn label(&self) -> &'static str {
        match self {
            Category::Seaweed  => "SEAWEED",
            Category::Location => "LOCATION",
            Category::Other    => "OTHER",
        }
    }

    /// The two categories that are counted, in display order
    pub fn counted() -> [Category; 2] {
        [Category::Seaweed, Category::Location]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single recognised entity occurrence. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub category: Category,

    /// Text of the span as it appears in the source (original casing)
    pub surface: String,

    /// Char offset of the first character of the span
    pub start: usize,

    /// Char offset one past the last character of the span
    pub end: usize,
}

impl Mention {
    pub fn new(category: Category, surface: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            category,
            surface: surface.into(),
            start,
            end,
        }
    }

    /// Span length in chars
    pub fn char_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// The case-folded key used for counting
    pub fn normalized(&self) -> String {
        self.surface.to_lowercase()
    }

    /// True when the span is a valid non-empty range into a text
    /// of `text_chars` characters
    pub fn fits(&self, text_chars: usize) -> bool {
        self.start < self.end && self.end <= text_chars
    }
}

/// Byte offset of every char boundary in `text`, including the
/// final boundary at `text.len()`. Index `i` holds the byte offset
/// of char `i`, so the table has `chars + 1` entries.
pub fn char_to_byte_offsets(text: &str) -> Vec<usize> {
    let mut offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
    offsets.push(text.len());
    offsets
}
