// ============================================================
// Layer 2 — Annotator
// ============================================================
// Runs the recognize → highlight → aggregate flow for one text,
// and builds Records and ResultSets out of it.
//
//   tabular rows → one Record per row, sequence_no from 1
//   PDF          → one Record; the abstract is highlighted on its
//                  own, counts cover the whole paper
//
// The recognizer is shared (Arc) and only ever read here.

use std::sync::Arc;

use crate::data::aggregator::aggregate;
use crate::data::highlighter::Highlighter;
use crate::data::pdf::ParsedPdf;
use crate::data::tabular::TabularRow;
use crate::domain::counts::EntitySummary;
use crate::domain::error::NerError;
use crate::domain::mention::Mention;
use crate::domain::record::{FullText, Record, ResultSet};
use crate::domain::traits::EntityRecognizer;

/// Everything derived from one piece of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedText {
    pub mentions:  Vec<Mention>,
    pub annotated: String,
    pub summary:   EntitySummary,
}

#[derive(Clone)]
pub struct Annotator {
    recognizer:  Arc<dyn EntityRecognizer>,
    highlighter: Highlighter,
}

impl Annotator {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer, highlighter: Highlighter::new() }
    }

    /// Recognize, highlight and count one text.
    /// Empty text is not an error, it yields an empty result.
    pub fn annotate_text(&self, text: &str) -> Result<AnnotatedText, NerError> {
        if text.is_empty() {
            return Ok(AnnotatedText::default());
        }

        let mentions  = self.recognizer.recognize(text)?;
        let annotated = self.highlighter.highlight(text, &mentions);
        let summary   = aggregate(&mentions);

        Ok(AnnotatedText { mentions, annotated, summary })
    }

    /// One Record per row. Fails as a whole if any row fails,
    /// so a partial batch is never returned.
    pub fn annotate_rows(&self, rows: &[TabularRow]) -> Result<ResultSet, NerError> {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let a = self.annotate_text(&row.abstract_)?;
                Ok(Record {
                    sequence_no:        i + 1,
                    title:              row.title.clone(),
                    raw_abstract:       row.abstract_.clone(),
                    annotated_abstract: a.annotated,
                    summary:            a.summary,
                    full_text:          None,
                })
            })
            .collect::<Result<Vec<_>, NerError>>()?;

        tracing::info!(
            "Annotated {} rows with the {} recognizer",
            records.len(),
            self.recognizer.name()
        );
        Ok(ResultSet::new(records))
    }

    /// A single Record for an uploaded paper
    pub fn annotate_pdf(&self, doc: &ParsedPdf) -> Result<ResultSet, NerError> {
        let abstract_ = self.annotate_text(&doc.abstract_)?;
        let full      = self.annotate_text(&doc.full_text)?;

        tracing::info!(
            "Annotated PDF '{}': {} mentions in full text",
            doc.title,
            full.mentions.len()
        );

        let title = (!doc.title.trim().is_empty()).then(|| doc.title.clone());
        Ok(ResultSet::new(vec![Record {
            sequence_no:        1,
            title,
            raw_abstract:       doc.abstract_.clone(),
            annotated_abstract: abstract_.annotated,
            summary:            full.summary,
            full_text:          Some(FullText {
                raw:              doc.full_text.clone(),
                annotated:        full.annotated,
                abstract_summary: abstract_.summary,
            }),
        }]))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mention::Category;
    use crate::ml::lexicon::LexiconRecognizer;

    fn annotator() -> Annotator {
        let lexicon = LexiconRecognizer::new([
            (Category::Seaweed, vec!["Ulva", "Eucheuma"]),
            (Category::Location, vec!["Bali"]),
        ])
        .unwrap();
        Annotator::new(Arc::new(lexicon))
    }

    /// Always fails, to check that nothing partial escapes
    struct Broken;

    impl EntityRecognizer for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn recognize(&self, _text: &str) -> Result<Vec<Mention>, NerError> {
            Err(NerError::Recognition("boom".into()))
        }
    }

    #[test]
    fn test_annotate_text() {
        let a = annotator().annotate_text("Ulva grows in Bali and bali.").unwrap();
        assert_eq!(a.mentions.len(), 3);
        assert_eq!(a.summary.seaweed.get("ulva"), 1);
        assert_eq!(a.summary.location.get("bali"), 2);
        assert!(a.annotated.starts_with("<span style=\"background-color:#FFA07A\">Ulva</span> grows"));
    }

    #[test]
    fn test_empty_text_is_empty_result() {
        let a = annotator().annotate_text("").unwrap();
        assert!(a.mentions.is_empty());
        assert_eq!(a.annotated, "");
        assert!(a.summary.is_empty());
    }

    #[test]
    fn test_rows_are_numbered_from_one() {
        let rows = vec![
            TabularRow { title: Some("A".into()), abstract_: "Ulva in Bali".into() },
            TabularRow { title: None, abstract_: String::new() },
            TabularRow { title: Some("C".into()), abstract_: "Eucheuma".into() },
        ];
        let rs = annotator().annotate_rows(&rows).unwrap();
        let numbers: Vec<usize> = rs.records().iter().map(|r| r.sequence_no).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(rs.records()[1].annotated_abstract, "");
        assert!(rs.records()[1].summary.is_empty());
        assert_eq!(rs.totals().seaweed.total(), 2);
        assert_eq!(rs.totals().location.total(), 1);
    }

    #[test]
    fn test_pdf_counts_cover_full_text() {
        let doc = ParsedPdf {
            title:     "Seaweed in Bali".into(),
            abstract_: "Ulva was sampled.".into(),
            full_text: "Seaweed in Bali\nAbstract\nUlva was sampled.\nMore Ulva in Bali.\n".into(),
        };
        let rs = annotator().annotate_pdf(&doc).unwrap();
        let r  = &rs.records()[0];

        assert_eq!(r.title.as_deref(), Some("Seaweed in Bali"));
        assert_eq!(r.summary.seaweed.get("ulva"), 2);
        assert_eq!(r.summary.location.get("bali"), 2);
        assert!(r.annotated_abstract.contains("#FFA07A\">Ulva</span>"));
        let full = r.full_text.as_ref().unwrap();
        assert!(full.annotated.contains("#ADD8E6\">Bali</span>"));
        assert_eq!(full.abstract_summary.seaweed.get("ulva"), 1);
        assert!(full.abstract_summary.location.is_empty());
        assert_eq!(rs.totals(), &r.summary);
    }

    #[test]
    fn test_pdf_without_title() {
        let doc = ParsedPdf::default();
        let rs  = annotator().annotate_pdf(&doc).unwrap();
        assert_eq!(rs.records()[0].title, None);
    }

    #[test]
    fn test_recognizer_failure_fails_whole_batch() {
        let annotator = Annotator::new(Arc::new(Broken));
        let rows = vec![TabularRow { title: None, abstract_: "Ulva".into() }];
        assert!(matches!(annotator.annotate_rows(&rows), Err(NerError::Recognition(_))));
    }
}
