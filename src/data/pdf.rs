// ============================================================
// Layer 4 — PDF Source Adapter
// ============================================================
// Pulls (title, abstract, full text) out of a PDF paper.
//
// Text extraction uses the pdf-extract crate, one String per
// page. The rules are deliberately simple:
//
//   Page 1 (lines of the normalised page text, blank lines count):
//     title    = line 0 (empty if the page has no lines, or if
//                line 0 itself is blank)
//     abstract = the (up to) 4 lines after the first line that
//                contains "abstract" (any case), joined by " "
//   Every page:
//     its extracted text, unmodified, appended to full_text in
//     page order
//
// Example first page:
//   "Seaweed farming in Bali"      ← title
//   "A. Author, B. Author"
//   "Abstract"                     ← marker line
//   "Ulva and Eucheuma were ..."   ┐
//   "... in Nusa Penida ..."       │ abstract (up to 4 lines)
//   "..."                          │
//   "..."                          ┘
//
// pdf-extract can panic on some malformed files, so extraction
// runs under catch_unwind and any failure maps to
// UnreadableDocument. No partial result is ever returned.

use std::panic;

use crate::data::preprocessor::Preprocessor;
use crate::domain::error::NerError;

/// Number of lines after the "abstract" marker that form the abstract
const ABSTRACT_LINES: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPdf {
    pub title:     String,
    pub abstract_: String,
    pub full_text: String,
}

/// Parse PDF bytes into title, abstract and full text.
pub fn parse_pdf(bytes: &[u8]) -> Result<ParsedPdf, NerError> {
    let pages = extract_pages(bytes)?;
    tracing::info!("Extracted {} PDF pages", pages.len());
    Ok(parse_pages(&pages))
}

/// Apply the title/abstract heuristics to already-extracted page texts
pub fn parse_pages(pages: &[String]) -> ParsedPdf {
    let prep      = Preprocessor::new();
    let mut doc   = ParsedPdf::default();

    for (i, raw) in pages.iter().enumerate() {
        if i == 0 {
            let text  = prep.clean_page(raw);
            let lines: Vec<&str> = text.lines().collect();
            doc.title     = lines.first().map(|l| l.to_string()).unwrap_or_default();
            doc.abstract_ = find_abstract(&lines);
        }

        doc.full_text.push_str(raw);
    }

    doc
}

/// The lines following the first line mentioning "abstract"
fn find_abstract(lines: &[&str]) -> String {
    lines
        .iter()
        .position(|line| line.to_lowercase().contains("abstract"))
        .map(|j| {
            let start = j + 1;
            let end   = (start + ABSTRACT_LINES).min(lines.len());
            lines[start..end].join(" ")
        })
        .unwrap_or_default()
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, NerError> {
    // Silence the default panic hook while pdf-extract runs so a
    // broken upload does not print a backtrace to the terminal.
    let hook   = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes));
    panic::set_hook(hook);

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e))    => Err(NerError::UnreadableDocument(format!("not a readable PDF ({e})"))),
        Err(_)        => Err(NerError::UnreadableDocument("PDF parser crashed on this file".into())),
    }
}


// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn pages(p: &[&str]) -> Vec<String> {
        p.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_title_and_abstract_from_first_page() {
        let doc = parse_pages(&pages(&[
            "Seaweed farming in Bali\nA. Author\nABSTRACT\nl1\nl2\nl3\nl4\nl5\n",
            "Introduction\nMore text\n",
        ]));
        assert_eq!(doc.title, "Seaweed farming in Bali");
        assert_eq!(doc.abstract_, "l1 l2 l3 l4");
        assert!(doc.full_text.starts_with("Seaweed farming in Bali\n"));
        assert!(doc.full_text.ends_with("Introduction\nMore text\n"));
    }

    #[test]
    fn test_abstract_shorter_than_four_lines() {
        let doc = parse_pages(&pages(&["Title\nAbstract: see below\nonly line\n"]));
        assert_eq!(doc.abstract_, "only line");
    }

    #[test]
    fn test_no_abstract_marker() {
        let doc = parse_pages(&pages(&["Title\nBody\n", "Abstract\nnot on page one\n"]));
        assert_eq!(doc.title, "Title");
        // Later pages never contribute an abstract
        assert_eq!(doc.abstract_, "");
        assert!(doc.full_text.contains("not on page one"));
    }

    #[test]
    fn test_blank_lines_count_as_lines() {
        let doc = parse_pages(&pages(&["\nSeaweed in Bali\nAbstract\nl1\n\nl2\nl3\nl4\n"]));
        assert_eq!(doc.title, "");
        assert_eq!(doc.abstract_, "l1  l2 l3");
    }

    #[test]
    fn test_full_text_is_kept_verbatim() {
        let doc = parse_pages(&pages(&["Title\r\n\r\nBody\ttext  \n", "Page\u{00A0}two"]));
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.full_text, "Title\r\n\r\nBody\ttext  \nPage\u{00A0}two");
    }

    #[test]
    fn test_title_line_keeps_its_whitespace() {
        let doc = parse_pages(&pages(&["  Kelp\tfarms \r\nAbstract\nx\n"]));
        assert_eq!(doc.title, "  Kelp\tfarms ");
        assert_eq!(doc.abstract_, "x");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse_pages(&[]), ParsedPdf::default());
        assert_eq!(parse_pages(&pages(&[""])).title, "");
    }

    #[test]
    fn test_parses_real_pdf_pages_in_order() {
        let bytes = fixtures::pdf_with_pages(&[
            &["Seaweed farming in Bali", "Abstract", "Ulva grows in Bali", "second line"],
            &["Introduction", "Sargassum beds"],
        ]);
        let doc = parse_pdf(&bytes).unwrap();

        // Title is line 0 of page 1; the extractor may start the page
        // with a line break, in which case line 0 is blank
        assert!(["", "Seaweed farming in Bali"].contains(&doc.title.trim()));
        assert!(doc.abstract_.contains("Ulva grows in Bali"));
        assert!(!doc.abstract_.contains("Introduction"));

        let first  = doc.full_text.find("Seaweed farming in Bali").unwrap();
        let second = doc.full_text.find("Sargassum beds").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let err = parse_pdf(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, NerError::UnreadableDocument(_)));
    }
}
