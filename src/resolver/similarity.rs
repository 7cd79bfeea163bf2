//! Name similarity strategies
//!
//! Scoring is behind a trait so the resolver's control flow does not care
//! which metric ranks candidates. The heuristic blend mirrors how staff
//! names actually fail to match in practice (containment, shared words);
//! Jaro-Winkler is the drop-in alternative when edit distance fits better.

use crate::normalize::fold_text;
use std::collections::HashSet;

/// Pluggable similarity metric over two folded names
pub trait NameScorer: Send + Sync {
    /// Score in [0, 1]; 1.0 means identical.
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Layered heuristic blend: equality, containment, shared-word ratio,
/// character-set overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl NameScorer for HeuristicScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        let a = fold_text(a);
        let b = fold_text(b);

        if a == b {
            return 1.0;
        }

        if a.contains(&b) || b.contains(&a) {
            return 0.8;
        }

        let words_a: HashSet<&str> = a.split_whitespace().collect();
        let words_b: HashSet<&str> = b.split_whitespace().collect();
        let shared = words_a.intersection(&words_b).count();
        if shared > 0 {
            return shared as f64 / words_a.len().max(words_b.len()) as f64;
        }

        let chars_a: HashSet<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
        let chars_b: HashSet<char> = b.chars().filter(|c| !c.is_whitespace()).collect();
        let max_chars = chars_a.len().max(chars_b.len());
        if max_chars == 0 {
            return 0.0;
        }
        chars_a.intersection(&chars_b).count() as f64 / max_chars as f64
    }
}

/// Jaro-Winkler metric from `strsim`
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinklerScorer;

impl NameScorer for JaroWinklerScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        strsim::jaro_winkler(&fold_text(a), &fold_text(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_equality() {
        assert_eq!(HeuristicScorer.score("Darvin", "darvin"), 1.0);
        assert_eq!(HeuristicScorer.score("Antônio", "antonio"), 1.0);
    }

    #[test]
    fn test_heuristic_containment() {
        assert_eq!(HeuristicScorer.score("Antonio", "Antonio Rabelo"), 0.8);
        assert_eq!(HeuristicScorer.score("Antonio Rabelo", "Rabelo"), 0.8);
    }

    #[test]
    fn test_heuristic_shared_words() {
        // One of two words shared: 1/2.
        let score = HeuristicScorer.score("Maria Souza", "Maria Lucia");
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heuristic_character_overlap() {
        let score = HeuristicScorer.score("darvin", "darwin");
        // d, a, r, i, n shared out of six distinct letters each.
        assert!(score > 0.6);
        assert!(score < 1.0);
    }

    #[test]
    fn test_jaro_winkler_close_names() {
        assert!(JaroWinklerScorer.score("darvin", "darwin") > 0.9);
        assert!(JaroWinklerScorer.score("josemir", "antonio") < 0.6);
    }
}
