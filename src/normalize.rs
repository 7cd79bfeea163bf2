//! Text normalization for keyword and name matching
//!
//! Portuguese input arrives with inconsistent accents and casing, both from
//! typed text and from speech transcription. Matching happens on a folded
//! form: NFD decomposition with combining marks stripped, lowercased, with
//! whitespace collapsed.

use unicode_normalization::UnicodeNormalization;

/// Latin combining diacritical marks block
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Fold text for matching: strip accents, lowercase, collapse whitespace.
///
/// # Examples
///
/// ```
/// use lua_assistant::normalize::fold_text;
///
/// assert_eq!(fold_text("Relatório do MÊS"), "relatorio do mes");
/// assert_eq!(fold_text("  Antônio   Rabelo "), "antonio rabelo");
/// ```
pub fn fold_text(s: &str) -> String {
    let stripped: String = s
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .flat_map(char::to_lowercase)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokenize folded text into words.
pub fn fold_tokens(s: &str) -> Vec<String> {
    fold_text(s)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_folding() {
        assert_eq!(fold_text("ção"), "cao");
        assert_eq!(fold_text("Mês passado"), "mes passado");
        assert_eq!(fold_text("JOALHERIA"), "joalheria");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(fold_text("  criar   vale  "), "criar vale");
    }

    #[test]
    fn test_tokens() {
        assert_eq!(fold_tokens("Maria Lúcia"), vec!["maria", "lucia"]);
    }
}
