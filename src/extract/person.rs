//! Person-name extraction
//!
//! Ordered pattern cascade: prepositional references first, then
//! "name + verb" constructions, then a bare capitalized word as the last
//! resort. The first candidate that survives the stopword filter wins.

use crate::normalize::fold_text;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Patterns tried in order. Each yields a single capture group with the
/// candidate name (one or two words).
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "para Darvin", "de Josemir"
        r"(?i)\b(?:para|pro|pra|de|do|da)\s+([A-Za-zÀ-ÿ]+(?:\s+[A-Za-zÀ-ÿ]+)?)",
        // "Darvin receber", "Josemir ganhar"
        r"(?i)([A-Za-zÀ-ÿ]+(?:\s+[A-Za-zÀ-ÿ]+)?)\s+(?:receber|ganhar)",
        // trailing prepositional reference
        r"(?i)\b(?:para|pro|pra|de|do|da)\s+([A-Za-zÀ-ÿ]+(?:\s+[A-Za-zÀ-ÿ]+)?)$",
        // bare capitalized word(s), case-sensitive
        r"\b([A-ZÀ-Ý][a-zà-ÿ]+(?:\s+[A-ZÀ-Ý][a-zà-ÿ]+)?)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract a person name from text.
///
/// `exclusions` holds accent-folded words that must never be treated as
/// names (domain nouns like "vale" or verbs like "criar"), even when
/// capitalized. Candidates shorter than three characters are discarded.
pub fn extract_name(text: &str, exclusions: &HashSet<&str>) -> Option<String> {
    for pattern in NAME_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            let candidate = captures.get(1)?.as_str().trim();
            if let Some(name) = filter_candidate(candidate, exclusions) {
                return Some(name);
            }
        }
    }

    None
}

/// Apply the stopword filter to a one- or two-word candidate. A trailing
/// stopword ("Josemir hoje") is dropped rather than rejecting the whole
/// candidate.
fn filter_candidate(candidate: &str, exclusions: &HashSet<&str>) -> Option<String> {
    let words: Vec<&str> = candidate.split_whitespace().collect();

    let kept: &[&str] = match words.as_slice() {
        [_, second] if exclusions.contains(fold_text(second).as_str()) => &words[..1],
        _ => &words[..],
    };

    if kept.is_empty() {
        return None;
    }

    let name = kept.join(" ");
    let folded = fold_text(&name);

    if folded.len() > 2 && folded.split_whitespace().all(|w| !exclusions.contains(w)) {
        Some(name)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclusions() -> HashSet<&'static str> {
        [
            "vale", "vales", "reais", "real", "dinheiro", "criar", "fazer", "dar", "pagar",
            "hoje", "cliente", "pedido",
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_prepositional_name() {
        let ex = exclusions();
        assert_eq!(
            extract_name("criar vale de 200 para Josemir", &ex),
            Some("Josemir".to_string())
        );
        assert_eq!(
            extract_name("mostrar vales de Darvin", &ex),
            Some("Darvin".to_string())
        );
    }

    #[test]
    fn test_receive_verb_pattern() {
        let ex = exclusions();
        assert_eq!(
            extract_name("Josemir receber 100", &ex),
            Some("Josemir".to_string())
        );
    }

    #[test]
    fn test_two_word_name() {
        let ex = exclusions();
        assert_eq!(
            extract_name("criar vale para Maria Lucia", &ex),
            Some("Maria Lucia".to_string())
        );
    }

    #[test]
    fn test_excluded_words_never_returned() {
        let ex = exclusions();
        // "Vale" is capitalized but stoplisted.
        assert_ne!(extract_name("criar Vale novo", &ex), Some("Vale".to_string()));
        assert_ne!(
            extract_name("pagar em Dinheiro", &ex),
            Some("Dinheiro".to_string())
        );
    }

    #[test]
    fn test_accented_exclusion_check() {
        let mut ex = exclusions();
        ex.insert("relatorio");
        assert_ne!(
            extract_name("gerar Relatório agora", &ex),
            Some("Relatório".to_string())
        );
    }

    #[test]
    fn test_trailing_stopword_dropped() {
        let ex = exclusions();
        assert_eq!(
            extract_name("criar vale para Josemir hoje", &ex),
            Some("Josemir".to_string())
        );
    }

    #[test]
    fn test_short_candidates_rejected() {
        let ex = exclusions();
        assert_eq!(extract_name("vale de Jo", &ex), None);
    }

    #[test]
    fn test_no_name() {
        let ex = exclusions();
        assert_eq!(extract_name("listar tudo", &ex), None);
    }
}
