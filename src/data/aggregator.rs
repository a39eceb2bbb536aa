// ============================================================
// Layer 4 — Mention Aggregator
// ============================================================
// Turns a list of mentions into per-category frequency counts.
//
// Rules:
//   1. Surface text is lower-cased before counting, so "Bali"
//      and "bali" land on the same key.
//   2. Every mention counts, including overlapping or duplicate
//      spans. Nothing is de-duplicated beyond case folding.
//   3. Mentions that are neither SEAWEED nor LOCATION are
//      skipped here (the highlighter still marks them).
//
// Batch totals are built by merging these per-text summaries,
// see domain::counts.

use crate::domain::counts::EntitySummary;
use crate::domain::mention::{Category, Mention};

pub fn aggregate(mentions: &[Mention]) -> EntitySummary {
    let mut summary = EntitySummary::new();

    for mention in mentions {
        match mention.category {
            Category::Seaweed  => summary.seaweed.add(mention.normalized()),
            Category::Location => summary.location.add(mention.normalized()),
            Category::Other    => {}
        }
    }

    summary
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn mentions() -> Vec<Mention> {
        vec![
            Mention::new(Category::Seaweed, "Ulva", 0, 4),
            Mention::new(Category::Location, "Bali", 14, 18),
            Mention::new(Category::Location, "bali", 23, 27),
            Mention::new(Category::Other, "FAO", 30, 33),
        ]
    }

    #[test]
    fn test_case_variants_merge() {
        let s = aggregate(&mentions());
        assert_eq!(s.seaweed.get("ulva"), 1);
        assert_eq!(s.location.get("bali"), 2);
        assert_eq!(s.location.unique(), 1);
    }

    #[test]
    fn test_other_category_is_not_counted() {
        let s = aggregate(&mentions());
        assert_eq!(s.seaweed.get("fao"), 0);
        assert_eq!(s.location.get("fao"), 0);
        assert_eq!(s.seaweed.total() + s.location.total(), 3);
    }

    #[test]
    fn test_repeated_mentions_are_not_deduplicated() {
        // Feeding the same mention list twice doubles every count
        let mut doubled = mentions();
        doubled.extend(mentions());
        let single = aggregate(&mentions());
        let twice  = aggregate(&doubled);
        assert_eq!(twice.location.get("bali"), 2 * single.location.get("bali"));
        assert_eq!(twice.seaweed.get("ulva"), 2);
    }

    #[test]
    fn test_overlapping_spans_both_count() {
        let m = vec![
            Mention::new(Category::Seaweed, "Ulva lactuca", 0, 12),
            Mention::new(Category::Seaweed, "Ulva", 0, 4),
        ];
        let s = aggregate(&m);
        assert_eq!(s.seaweed.total(), 2);
        assert_eq!(s.seaweed.get("ulva lactuca"), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }
}
