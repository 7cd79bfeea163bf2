//! Entity Resolver
//!
//! Matches a free-text name against a collection of domain records. The
//! cascade runs cheap exact strategies first and only falls back to
//! similarity scoring when nothing else hits:
//!
//! 1. Fold + apply the correction table for known misspellings
//! 2. Exact case-insensitive match
//! 3. Containment either direction
//! 4. Token match (candidate words of three or more characters)
//! 5. Similarity fallback, best score above threshold
//!
//! The resolver operates on any `{id, name}`-like slice, independent of the
//! storage backend.

pub mod similarity;

pub use similarity::{HeuristicScorer, JaroWinklerScorer, NameScorer};

use crate::normalize::fold_text;
use std::collections::HashMap;
use tracing::debug;

/// Minimum similarity for the fallback tier to accept a match.
const MATCH_THRESHOLD: f64 = 0.6;

/// Minimum similarity for a name to appear in ranked suggestions.
const SUGGESTION_THRESHOLD: f64 = 0.3;

/// Anything with a display name can be resolved.
pub trait Named {
    fn display_name(&self) -> &str;
}

impl Named for (i64, String) {
    fn display_name(&self) -> &str {
        &self.1
    }
}

/// Fuzzy name-to-record resolver
pub struct NameResolver {
    corrections: HashMap<String, String>,
    scorer: Box<dyn NameScorer>,
    threshold: f64,
}

impl NameResolver {
    /// Resolver with the heuristic scorer and the given correction table.
    /// Correction keys and values must be accent-folded.
    pub fn new(corrections: HashMap<String, String>) -> Self {
        Self {
            corrections,
            scorer: Box::new(HeuristicScorer),
            threshold: MATCH_THRESHOLD,
        }
    }

    /// Swap in a different similarity strategy.
    pub fn with_scorer(mut self, scorer: Box<dyn NameScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Normalize a candidate and apply the correction table.
    pub fn canonical(&self, candidate: &str) -> String {
        let folded = fold_text(candidate);
        self.corrections
            .get(&folded)
            .cloned()
            .unwrap_or(folded)
    }

    /// Find the best-matching record for a candidate name.
    pub fn resolve<'a, T: Named>(&self, candidate: &str, records: &'a [T]) -> Option<&'a T> {
        if candidate.trim().is_empty() {
            return None;
        }

        let wanted = self.canonical(candidate);

        // Exact match
        if let Some(record) = records
            .iter()
            .find(|r| fold_text(r.display_name()) == wanted)
        {
            return Some(record);
        }

        // Containment either direction
        if let Some(record) = records.iter().find(|r| {
            let name = fold_text(r.display_name());
            name.contains(&wanted) || wanted.contains(&name)
        }) {
            return Some(record);
        }

        // Token match: any candidate word of three or more characters
        for token in wanted.split_whitespace().filter(|t| t.len() >= 3) {
            if let Some(record) = records
                .iter()
                .find(|r| fold_text(r.display_name()).contains(token))
            {
                return Some(record);
            }
        }

        // Similarity fallback
        let mut best: Option<(&T, f64)> = None;
        for record in records {
            let score = self.scorer.score(&wanted, record.display_name());
            if score > self.threshold && best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((record, score));
            }
        }

        if let Some((record, score)) = best {
            debug!(
                candidate = candidate,
                matched = record.display_name(),
                score,
                "resolved name via similarity fallback"
            );
            return Some(record);
        }

        None
    }

    /// Names ranked by similarity to the candidate, best first, for
    /// "did you mean" suggestions.
    pub fn suggestions<T: Named>(&self, candidate: &str, records: &[T]) -> Vec<String> {
        let wanted = self.canonical(candidate);

        let mut scored: Vec<(f64, &str)> = records
            .iter()
            .map(|r| (self.scorer.score(&wanted, r.display_name()), r.display_name()))
            .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(_, name)| name.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> Vec<(i64, String)> {
        vec![
            (1, "Antonio Rabelo".to_string()),
            (2, "Antonio Darvin".to_string()),
            (3, "Maria Lucia".to_string()),
            (4, "Josemir".to_string()),
        ]
    }

    fn resolver() -> NameResolver {
        let corrections = HashMap::from([
            ("darwin".to_string(), "darvin".to_string()),
            ("darvim".to_string(), "darvin".to_string()),
            ("rabelo".to_string(), "antonio rabelo".to_string()),
        ]);
        NameResolver::new(corrections)
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let records = staff();
        let found = resolver().resolve("josemir", &records).unwrap();
        assert_eq!(found.0, 4);
    }

    #[test]
    fn test_correction_table_idempotence() {
        let records = staff();
        let r = resolver();
        let darwin = r.resolve("Darwin", &records).unwrap();
        let darvin = r.resolve("Darvin", &records).unwrap();
        assert_eq!(darwin.0, darvin.0);
        assert_eq!(darwin.0, 2);
    }

    #[test]
    fn test_containment() {
        let records = staff();
        let found = resolver().resolve("Antonio", &records).unwrap();
        // First containment hit in collection order.
        assert_eq!(found.0, 1);
    }

    #[test]
    fn test_token_match() {
        let records = staff();
        let found = resolver().resolve("sr lucia", &records).unwrap();
        assert_eq!(found.0, 3);
    }

    #[test]
    fn test_accented_input() {
        let records = staff();
        let found = resolver().resolve("Maria Lúcia", &records).unwrap();
        assert_eq!(found.0, 3);
    }

    #[test]
    fn test_no_match_below_threshold() {
        let records = staff();
        assert!(resolver().resolve("Zebedeu", &records).is_none());
    }

    #[test]
    fn test_empty_candidate() {
        let records = staff();
        assert!(resolver().resolve("   ", &records).is_none());
    }

    #[test]
    fn test_suggestions_ranked() {
        let records = staff();
        let suggestions = resolver().suggestions("Darvim", &records);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0], "Antonio Darvin");
    }

    #[test]
    fn test_swappable_scorer() {
        let records = vec![(2, "Darvin".to_string()), (4, "Josemir".to_string())];
        let r = NameResolver::new(HashMap::new()).with_scorer(Box::new(JaroWinklerScorer));
        // No correction table: pure edit distance still lands on Darvin.
        let found = r.resolve("Darwim", &records).unwrap();
        assert_eq!(found.0, 2);
    }
}
