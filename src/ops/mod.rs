//! Farm operations over the document store.
//!
//! CLI handlers and GraphQL resolvers stay thin and delegate here. An operation that writes
//! more than one document stages every write in one [`WriteBatch`](crate::store::WriteBatch),
//! so either all of them land or none do.
//!
//! - `companies.rs`: company administration and the active-company check
//! - `inventory.rs`: stock items, restocking, usage, stock-takes
//! - `needed.rs`: the shopping list and receiving goods into stock
//! - `harvest.rs`: harvest collections, pickers, weighing and picker payroll
//! - `wallet.rs`: cash pools pickers are paid from
//! - `work_logs.rs`: daily work records and labour summaries
//! - `work_cards.rs`: planned-vs-actual work cards and their review flow
//! - `challenges.rs`: seasonal problem reports
//! - `overview.rs`: dashboard totals

pub mod challenges;
pub mod companies;
pub mod harvest;
pub mod inventory;
pub mod needed;
pub mod overview;
pub mod wallet;
pub mod work_cards;
pub mod work_logs;

use crate::error::Result;
use crate::validation;
use chrono::{Local, NaiveDate};

/// The local calendar date, used when an operation is not given one.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Trims an optional text field; blank input becomes `None`.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Appends a paragraph to a notes body.
pub(crate) fn append_note(notes: &mut String, line: &str) -> Result<()> {
    if !notes.trim().is_empty() {
        notes.push_str("\n\n");
    }
    notes.push_str(line);
    validation::validate_notes(notes)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::companies::{self, NewCompany};
    use crate::config::FurrowConfig;
    use crate::model::Company;
    use crate::store::Store;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    pub fn setup_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(&FurrowConfig::default(), temp_dir.path());
        (store, temp_dir)
    }

    pub fn seed_company(store: &Store) -> Company {
        companies::create_company(store, NewCompany::named("Kericho Highlands")).unwrap()
    }

    pub fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_blanks() {
        assert_eq!(clean(Some("  ".to_string())), None);
        assert_eq!(clean(Some(" Nakuru ".to_string())), Some("Nakuru".to_string()));
        assert_eq!(clean(None), None);
    }

    #[test]
    fn test_append_note() {
        let mut notes = String::new();
        append_note(&mut notes, "first").unwrap();
        append_note(&mut notes, "second").unwrap();
        assert_eq!(notes, "first\n\nsecond");
    }
}
