// ============================================================
// Layer 4 — Highlighter
// ============================================================
// Produces a display copy of a text with every recognised
// mention wrapped in a coloured <span>.
//
// Markers are spliced in at the recognised offsets only. Another
// occurrence of the same word that the recognizer did NOT label
// stays untouched, and one entity whose text is a substring of
// another cannot be wrapped twice.
//
// Algorithm (single left-to-right pass):
//   1. Drop mentions whose span is empty or out of range
//   2. Sort by start ascending, then by length descending
//   3. Walk the mentions; skip any that starts before the end of
//      the last kept span (overlap → first/longest wins)
//   4. Copy the gaps verbatim, wrap the kept spans
//
// Example:
//   text:     "Ulva grows in Bali."
//   mentions: Ulva [0,4) SEAWEED, Bali [14,18) LOCATION
//   output:   "<span style=\"background-color:#FFA07A\">Ulva</span> grows in
//              <span style=\"background-color:#ADD8E6\">Bali</span>."
//
// Highlighting already-annotated text is not supported: the
// offsets would point into the markup.

use crate::domain::mention::{char_to_byte_offsets, Category, Mention};

pub const SEAWEED_COLOR:  &str = "#FFA07A";
pub const LOCATION_COLOR: &str = "#ADD8E6";
pub const DEFAULT_COLOR:  &str = "#FFFF00";

#[derive(Debug, Clone)]
pub struct Highlighter {
    seaweed_color:  String,
    location_color: String,
    default_color:  String,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            seaweed_color:  SEAWEED_COLOR.to_string(),
            location_color: LOCATION_COLOR.to_string(),
            default_color:  DEFAULT_COLOR.to_string(),
        }
    }

    /// Background colour used for a category
    pub fn color_for(&self, category: Category) -> &str {
        match category {
            Category::Seaweed  => &self.seaweed_color,
            Category::Location => &self.location_color,
            Category::Other    => &self.default_color,
        }
    }

    /// Wrap `inner` in the marker for `category`
    pub fn marker(&self, category: Category, inner: &str) -> String {
        format!(
            "<span style=\"background-color:{}\">{}</span>",
            self.color_for(category),
            inner
        )
    }

    /// Return `text` with every (non-overlapping) mention wrapped.
    pub fn highlight(&self, text: &str, mentions: &[Mention]) -> String {
        if mentions.is_empty() {
            return text.to_string();
        }

        let offsets    = char_to_byte_offsets(text);
        let text_chars = offsets.len() - 1;

        let mut spans: Vec<&Mention> = mentions
            .iter()
            .filter(|m| {
                let ok = m.fits(text_chars);
                if !ok {
                    tracing::warn!(
                        "Skipping mention '{}' with invalid span [{}, {}) for text of {} chars",
                        m.surface, m.start, m.end, text_chars
                    );
                }
                ok
            })
            .collect();
        spans.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.char_len().cmp(&a.char_len())));

        let mut out       = String::with_capacity(text.len() + spans.len() * 48);
        let mut last_char = 0usize;

        for m in spans {
            // Overlaps the span we already wrapped
            if m.start < last_char {
                continue;
            }
            out.push_str(&text[offsets[last_char]..offsets[m.start]]);
            out.push_str(&self.marker(m.category, &text[offsets[m.start]..offsets[m.end]]));
            last_char = m.end;
        }
        out.push_str(&text[offsets[last_char]..]);

        out
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}
