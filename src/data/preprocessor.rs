// ============================================================
// Layer 4 — PDF Page Text Preprocessor
// ============================================================
// Normalises the raw text that pdf-extract returns for one page
// before the title/abstract rules split it into lines.
//
// Only two things change:
//   1. Line boundaries become '\n'. Besides \r\n and \r this
//      covers the other Unicode line separators (form feed,
//      vertical tab, NEL, U+2028/2029, ...), so every boundary
//      a reader would see is one `str::lines` boundary.
//   2. Non-breaking (U+00A0) and zero-width (U+200B) spaces
//      become a plain space.
//
// Everything else is kept as extracted: blank lines, tabs,
// leading and trailing spaces. The title is line 0 even when
// that line is empty.

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Normalise one page of extracted text
    pub fn clean_page(&self, text: &str) -> String {
        let mut out   = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    // \r\n is a single boundary
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.push('\n');
                }
                c if is_line_boundary(c) => out.push('\n'),
                '\u{00A0}' | '\u{200B}'  => out.push(' '),
                c                        => out.push(c),
            }
        }
        out
    }
}

/// Line separators other than '\r'
fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalises_line_endings() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_page("a\r\nb\rc\x0cd\u{2028}e"), "a\nb\nc\nd\ne");
    }

    #[test]
    fn test_keeps_blank_lines() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_page("\n\nTitle\r\n\r\nAbstract\n"), "\n\nTitle\n\nAbstract\n");
    }

    #[test]
    fn test_keeps_tabs_and_trailing_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_page("Body\ttext  \n"), "Body\ttext  \n");
    }

    #[test]
    fn test_replaces_special_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_page("Ulva\u{00A0}sp.\u{200B}x"), "Ulva sp. x");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_page(""), "");
    }
}
