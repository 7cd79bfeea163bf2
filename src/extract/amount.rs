//! Monetary amount and bare-count extraction

use once_cell::sync::Lazy;
use regex::Regex;

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:R\$)?\s*(\d+(?:[.,]\d{1,2})?)").unwrap());

static COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+)\b").unwrap());

/// Extract the first monetary amount from text.
///
/// Accepts an optional `R$` marker and either comma or dot as the decimal
/// separator. Returns the first numeric match.
///
/// # Examples
///
/// ```
/// use lua_assistant::extract::extract_amount;
///
/// assert_eq!(extract_amount("R$ 123,45"), Some(123.45));
/// assert_eq!(extract_amount("123.45"), Some(123.45));
/// assert_eq!(extract_amount("R$123"), Some(123.0));
/// assert_eq!(extract_amount("sem valor nenhum"), None);
/// ```
pub fn extract_amount(text: &str) -> Option<f64> {
    let captures = AMOUNT_RE.captures(text)?;
    let raw = captures.get(1)?.as_str().replace(',', ".");
    raw.parse::<f64>().ok()
}

/// Extract the first bare integer from text (quantities, ids).
pub fn extract_count(text: &str) -> Option<i64> {
    let captures = COUNT_RE.captures(text)?;
    captures.get(1)?.as_str().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_with_currency_marker_and_comma() {
        assert_eq!(extract_amount("criar vale de R$ 123,45"), Some(123.45));
    }

    #[test]
    fn test_amount_dot_decimal() {
        assert_eq!(extract_amount("123.45"), Some(123.45));
    }

    #[test]
    fn test_amount_integer() {
        assert_eq!(extract_amount("R$123"), Some(123.0));
        assert_eq!(extract_amount("vale de 200 para Josemir"), Some(200.0));
    }

    #[test]
    fn test_amount_absent() {
        assert_eq!(extract_amount("listar clientes"), None);
    }

    #[test]
    fn test_first_match_wins() {
        // Two numbers: the first one is taken, per the documented contract.
        assert_eq!(extract_amount("alterar vale 3 para 250"), Some(3.0));
    }

    #[test]
    fn test_count() {
        assert_eq!(extract_count("adicionar 10 unidades de prata"), Some(10));
        assert_eq!(extract_count("sem numeros"), None);
    }
}
