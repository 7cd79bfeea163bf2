//! Date and period extraction
//!
//! Relative keywords are checked before the absolute `DD/MM/YYYY` pattern.
//! The `_from` variants take an explicit anchor date so callers and tests
//! stay deterministic; the plain variants anchor at the local clock.

use crate::normalize::fold_text;
use chrono::{Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ABSOLUTE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})").unwrap());

/// Inclusive date range for report aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

/// Extract a date anchored at the local clock.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    extract_date_from(text, Local::now().date_naive())
}

/// Extract a date from text, relative keywords first.
pub fn extract_date_from(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let folded = fold_text(text);

    if folded.contains("hoje") {
        return Some(today);
    }
    if folded.contains("ontem") {
        return Some(today - Duration::days(1));
    }
    if folded.contains("amanha") {
        return Some(today + Duration::days(1));
    }
    if folded.contains("semana passada") {
        return Some(today - Duration::weeks(1));
    }
    if folded.contains("proxima semana") {
        return Some(today + Duration::weeks(1));
    }
    if folded.contains("mes passado") {
        return Some(today - Duration::days(30));
    }

    let captures = ABSOLUTE_DATE_RE.captures(text)?;
    let day: u32 = captures.get(1)?.as_str().parse().ok()?;
    let month: u32 = captures.get(2)?.as_str().parse().ok()?;
    let mut year: i32 = captures.get(3)?.as_str().parse().ok()?;
    if year < 100 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Resolve the reporting period an utterance refers to.
///
/// An explicit or relative date narrows the range to that day; "semana"
/// spans the trailing seven days and "mes" the trailing thirty; the default
/// is today.
pub fn extract_period_from(text: &str, today: NaiveDate) -> DateRange {
    if let Some(day) = extract_date_from(text, today) {
        return DateRange::single(day);
    }

    let folded = fold_text(text);
    if folded.contains("semana") {
        return DateRange {
            start: today - Duration::days(7),
            end: today,
        };
    }
    if folded.contains("mes") {
        return DateRange {
            start: today - Duration::days(30),
            end: today,
        };
    }

    DateRange::single(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_relative_keywords() {
        let today = anchor();
        assert_eq!(extract_date_from("vales de hoje", today), Some(today));
        assert_eq!(
            extract_date_from("vendas de ontem", today),
            Some(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap())
        );
        assert_eq!(
            extract_date_from("entregar amanhã", today),
            Some(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap())
        );
        assert_eq!(
            extract_date_from("pedidos da semana passada", today),
            Some(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap())
        );
    }

    #[test]
    fn test_absolute_date() {
        let today = anchor();
        assert_eq!(
            extract_date_from("encomendas de 03/05/2025", today),
            Some(NaiveDate::from_ymd_opt(2025, 5, 3).unwrap())
        );
        // Two-digit years land in the 2000s.
        assert_eq!(
            extract_date_from("vendas em 3-5-24", today),
            Some(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap())
        );
    }

    #[test]
    fn test_relative_takes_precedence_over_absolute() {
        let today = anchor();
        assert_eq!(
            extract_date_from("hoje ou 01/01/2020", today),
            Some(today)
        );
    }

    #[test]
    fn test_invalid_absolute_date() {
        assert_eq!(extract_date_from("dia 32/13/2025", anchor()), None);
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date_from("listar clientes", anchor()), None);
    }

    #[test]
    fn test_period_month() {
        let today = anchor();
        let range = extract_period_from("relatório do mês", today);
        assert_eq!(range.end, today);
        assert_eq!(range.start, today - Duration::days(30));
    }

    #[test]
    fn test_period_week() {
        let today = anchor();
        let range = extract_period_from("resumo da semana", today);
        assert_eq!(range.start, today - Duration::days(7));
    }

    #[test]
    fn test_period_defaults_to_today() {
        let today = anchor();
        assert_eq!(
            extract_period_from("relatório de vendas", today),
            DateRange::single(today)
        );
    }

    #[test]
    fn test_period_explicit_day() {
        let today = anchor();
        let range = extract_period_from("relatório de 01/06/2025", today);
        assert_eq!(
            range,
            DateRange::single(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
        );
    }
}
