// ============================================================
// Layer 4 — Token Window Chunker
// ============================================================
// Splits a long token sequence into overlapping windows that
// fit the model's maximum input length.
//
// Why do we need windows?
//   The position embedding table has a fixed size, so the model
//   can only look at `window` tokens at once. Long abstracts and
//   full PDF texts are much longer than that.
//
// Solution: sliding windows with overlap
//   - Each window holds at most `window` tokens
//   - Consecutive windows share `overlap` tokens
//   - Every token is "owned" by exactly one window: the one in
//     which it sits furthest from a cut edge, so its label is
//     predicted with the most context on both sides
//
// Example with window=6, overlap=2, 12 tokens:
//   Window 1: tokens 0..6    owns 0..5
//   Window 2: tokens 4..10   owns 5..9
//   Window 3: tokens 8..12   owns 9..12
//
// The stride (step between windows) = window - overlap

use std::ops::Range;

/// One window over a token sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWindow {
    /// Tokens fed to the model for this window
    pub span: Range<usize>,
    /// Tokens whose predicted label is taken from this window
    pub owned: Range<usize>,
}

pub struct Chunker {
    /// Maximum number of tokens per window
    window: usize,
    /// Number of tokens shared between adjacent windows
    overlap: usize,
}

impl Chunker {
    /// Create a new Chunker.
    ///
    /// # Panics
    /// Panics if overlap >= window, because the stride would be
    /// zero and the windows would never advance
    pub fn new(window: usize, overlap: usize) -> Self {
        assert!(
            overlap < window,
            "overlap ({}) must be less than window ({})",
            overlap,
            window
        );
        Self { window, overlap }
    }

    /// Windows covering `token_count` tokens, in order.
    pub fn windows(&self, token_count: usize) -> Vec<TokenWindow> {
        if token_count == 0 {
            return Vec::new();
        }

        let stride    = self.window - self.overlap;
        let half      = self.overlap / 2;
        let mut spans = Vec::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.window).min(token_count);
            spans.push(start..end);
            if end == token_count {
                break;
            }
            start += stride;
        }

        // Hand each overlap region half to either side
        let last = spans.len() - 1;
        spans
            .iter()
            .enumerate()
            .map(|(i, span)| {
                let owned_start = if i == 0 { 0 } else { span.start + half };
                let owned_end   = if i == last { span.end } else { spans[i + 1].start + half };
                TokenWindow {
                    span:  span.clone(),
                    owned: owned_start..owned_end,
                }
            })
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequence_gives_one_window() {
        let c = Chunker::new(100, 10);
        assert_eq!(
            c.windows(7),
            vec![TokenWindow { span: 0..7, owned: 0..7 }]
        );
    }

    #[test]
    fn test_overlapping_windows() {
        let c = Chunker::new(6, 2);
        let w = c.windows(12);
        assert_eq!(w.len(), 3);
        assert_eq!(w[0], TokenWindow { span: 0..6, owned: 0..5 });
        assert_eq!(w[1], TokenWindow { span: 4..10, owned: 5..9 });
        assert_eq!(w[2], TokenWindow { span: 8..12, owned: 9..12 });
    }

    #[test]
    fn test_every_token_owned_exactly_once() {
        let c = Chunker::new(8, 3);
        for n in [1usize, 8, 9, 20, 33] {
            let windows = c.windows(n);
            let mut owned: Vec<usize> = windows.iter().flat_map(|w| w.owned.clone()).collect();
            owned.sort_unstable();
            assert_eq!(owned, (0..n).collect::<Vec<_>>(), "n = {n}");
            for w in &windows {
                assert!(w.owned.start >= w.span.start && w.owned.end <= w.span.end);
            }
        }
    }

    #[test]
    fn test_empty_sequence_gives_no_windows() {
        let c = Chunker::new(5, 2);
        assert!(c.windows(0).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_overlap_must_be_less_than_window() {
        let _ = Chunker::new(5, 5);
    }
}
