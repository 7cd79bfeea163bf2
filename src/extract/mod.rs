//! Lexical Extractors
//!
//! Stateless functions that pull atomic values out of raw Portuguese text:
//! money amounts, person names, dates and quantities. Each extractor is
//! deterministic for a given input and resolves ambiguity by taking the
//! first match; multiple candidates in one utterance are not disambiguated
//! further.

mod amount;
mod person;
mod temporal;

pub use amount::{extract_amount, extract_count};
pub use person::extract_name;
pub use temporal::{extract_date, extract_date_from, extract_period_from, DateRange};
