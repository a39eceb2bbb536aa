// ============================================================
// Layer 3 — Entity Frequency Counts
// ============================================================
// An explicit frequency map with well-defined merge semantics,
// used both per record and for a whole batch.
//
// Merging is element-wise addition, which is commutative and
// associative, so the batch totals are the same no matter in
// which order records are folded together:
//
//   {ulva: 1, bali: 2} + {bali: 1, java: 1} = {ulva: 1, bali: 3, java: 1}
//
// Keys are already case-folded by the time they get here
// (see data::aggregator). A BTreeMap keeps iteration order
// deterministic for tests and exports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::Sum;

use crate::domain::mention::Category;

/// normalized entity text → number of occurrences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    counts: BTreeMap<String, usize>,
}

impl EntityCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `key`
    pub fn add(&mut self, key: impl Into<String>) {
        self.add_n(key, 1);
    }

    pub fn add_n(&mut self, key: impl Into<String>, n: usize) {
        *self.counts.entry(key.into()).or_insert(0) += n;
    }

    /// Element-wise sum of `other` into `self`
    pub fn merge(&mut self, other: &EntityCounts) {
        for (key, n) in &other.counts {
            self.add_n(key.clone(), *n);
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Total occurrences across all keys
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct keys
    pub fn unique(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// All entries, highest count first. Ties are broken by
    /// entity text so the order is stable between runs.
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|(k, n)| (k.clone(), *n))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// The `n` most frequent entries
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// One-line rendering used in result tables and exports:
    ///   "ulva (3), sargassum (1)"
    pub fn summary_line(&self) -> String {
        self.ranked()
            .iter()
            .map(|(entity, count)| format!("{entity} ({count})"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<String> for EntityCounts {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut counts = EntityCounts::new();
        for key in iter {
            counts.add(key);
        }
        counts
    }
}

// ─── EntitySummary ────────────────────────────────────────────────────────────
/// Counts for the two counted categories side by side.
/// Used as a per-record summary and as the batch-wide
/// aggregate counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub seaweed:  EntityCounts,
    pub location: EntityCounts,
}

/// The batch-wide running totals are the same shape as a summary
pub type AggregateCounters = EntitySummary;

impl EntitySummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: &EntitySummary) {
        self.seaweed.merge(&other.seaweed);
        self.location.merge(&other.location);
    }

    /// Counts for one category. `Other` is never counted so it
    /// always yields an empty map.
    pub fn for_category(&self, category: Category) -> EntityCounts {
        match category {
            Category::Seaweed  => self.seaweed.clone(),
            Category::Location => self.location.clone(),
            Category::Other    => EntityCounts::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.seaweed.is_empty() && self.location.is_empty()
    }

    /// The "Total Entity Counts" table: one row per counted category
    pub fn overview(&self) -> Vec<CategoryOverview> {
        Category::counted()
            .into_iter()
            .map(|category| {
                let counts = self.for_category(category);
                CategoryOverview {
                    category,
                    unique_entities:   counts.unique(),
                    total_occurrences: counts.total(),
                }
            })
            .collect()
    }
}

impl<'a> Sum<&'a EntitySummary> for EntitySummary {
    fn sum<I: Iterator<Item = &'a EntitySummary>>(iter: I) -> Self {
        iter.fold(EntitySummary::new(), |mut acc, s| {
            acc.merge(s);
            acc
        })
    }
}

/// Distinct and total counts for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOverview {
    pub category:          Category,
    pub unique_entities:   usize,
    pub total_occurrences: usize,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> EntityCounts {
        let mut c = EntityCounts::new();
        for (k, n) in pairs {
            c.add_n(*k, *n);
        }
        c
    }

    #[test]
    fn test_merge_adds_elementwise() {
        let mut a = counts(&[("ulva", 1), ("bali", 2)]);
        a.merge(&counts(&[("bali", 1), ("java", 1)]));
        assert_eq!(a, counts(&[("ulva", 1), ("bali", 3), ("java", 1)]));
    }

    #[test]
    fn test_merge_is_order_independent() {
        let parts = vec![
            counts(&[("ulva", 1)]),
            counts(&[("ulva", 2), ("gracilaria", 1)]),
            counts(&[("gracilaria", 4)]),
        ];

        let mut forward = EntityCounts::new();
        for p in &parts {
            forward.merge(p);
        }
        let mut backward = EntityCounts::new();
        for p in parts.iter().rev() {
            backward.merge(p);
        }
        assert_eq!(forward, backward);
        assert_eq!(forward.get("ulva"), 3);
        assert_eq!(forward.total(), 8);
    }

    #[test]
    fn test_ranked_breaks_ties_by_text() {
        let c = counts(&[("sargassum", 2), ("eucheuma", 2), ("ulva", 5)]);
        assert_eq!(
            c.ranked(),
            vec![
                ("ulva".to_string(), 5),
                ("eucheuma".to_string(), 2),
                ("sargassum".to_string(), 2),
            ]
        );
        assert_eq!(c.top(1), vec![("ulva".to_string(), 5)]);
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(EntityCounts::new().summary_line(), "");
        let c = counts(&[("bali", 2), ("ulva", 1)]);
        assert_eq!(c.summary_line(), "bali (2), ulva (1)");
    }

    #[test]
    fn test_sum_of_summaries_and_overview() {
        let a = EntitySummary {
            seaweed:  counts(&[("ulva", 1)]),
            location: counts(&[("bali", 2)]),
        };
        let b = EntitySummary {
            seaweed:  counts(&[("ulva", 1), ("kappaphycus", 1)]),
            location: EntityCounts::new(),
        };
        let total: EntitySummary = [a, b].iter().sum();
        let overview = total.overview();
        assert_eq!(overview[0].category, Category::Seaweed);
        assert_eq!(overview[0].unique_entities, 2);
        assert_eq!(overview[0].total_occurrences, 3);
        assert_eq!(overview[1].total_occurrences, 2);
        assert!(total.for_category(Category::Other).is_empty());
    }
}
