//! Input validation for farm records.

use crate::error::{FurrowError, Result};
use rust_decimal::Decimal;

/// Maximum allowed length for names and titles.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum allowed length for the notes body of a document.
pub const MAX_NOTES_LENGTH: usize = 50_000;

/// Maximum allowed length for a document ID.
pub const MAX_ID_LENGTH: usize = 50;

/// Maximum allowed length for short labels such as units and seasons.
pub const MAX_LABEL_LENGTH: usize = 40;

/// Largest quantity, weight, price or amount accepted from input (one trillion).
pub const MAX_VALUE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Largest head count accepted for one piece of work.
pub const MAX_WORKERS: u32 = 100_000;

/// Characters forbidden in IDs to prevent path traversal.
const FORBIDDEN_ID_CHARS: &[char] = &['/', '\\', '\0', ':'];

/// Validates a human-readable name (company, item, picker, card title...).
pub fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FurrowError::Validation(format!("{} cannot be empty", field)));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(FurrowError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Validates a short label such as a unit of measure or a season name.
pub fn validate_label(field: &str, label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(FurrowError::Validation(format!("{} cannot be empty", field)));
    }
    if label.chars().count() > MAX_LABEL_LENGTH {
        return Err(FurrowError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_LABEL_LENGTH
        )));
    }
    Ok(())
}

/// Validates the free-form notes body.
pub fn validate_notes(notes: &str) -> Result<()> {
    if notes.len() > MAX_NOTES_LENGTH {
        return Err(FurrowError::Validation(format!(
            "Notes exceed maximum length of {} characters",
            MAX_NOTES_LENGTH
        )));
    }
    Ok(())
}

/// Validates a document ID to prevent path traversal attacks.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(FurrowError::InvalidId("ID cannot be empty".to_string()));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(FurrowError::InvalidId(format!(
            "ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }
    if id.contains("..") {
        return Err(FurrowError::InvalidId(
            "ID cannot contain '..' (path traversal)".to_string(),
        ));
    }
    for c in FORBIDDEN_ID_CHARS {
        if id.contains(*c) {
            return Err(FurrowError::InvalidId(format!("ID cannot contain '{}'", c)));
        }
    }
    Ok(())
}

/// Validates that a quantity or amount is strictly positive.
pub fn validate_positive(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(FurrowError::Validation(format!(
            "{} must be greater than 0, got {}",
            field, value
        )));
    }
    validate_at_most_max(field, value)
}

/// Validates that a quantity or amount is zero or more.
pub fn validate_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(FurrowError::Validation(format!(
            "{} cannot be negative, got {}",
            field, value
        )));
    }
    validate_at_most_max(field, value)
}

fn validate_at_most_max(field: &str, value: Decimal) -> Result<()> {
    if value > MAX_VALUE {
        return Err(FurrowError::Validation(format!(
            "{} cannot exceed {}, got {}",
            field, MAX_VALUE, value
        )));
    }
    Ok(())
}

/// Validates a head count.
pub fn validate_workers(workers: u32) -> Result<()> {
    if workers == 0 {
        return Err(FurrowError::Validation(
            "Workers must be at least 1".to_string(),
        ));
    }
    if workers > MAX_WORKERS {
        return Err(FurrowError::Validation(format!(
            "Workers cannot exceed {}, got {}",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

fn overflow(what: &str) -> FurrowError {
    FurrowError::Validation(format!("{} is too large to compute", what))
}

/// `a + b`, or a validation error naming `what` when the result does not fit.
pub fn checked_add(what: &str, a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(what))
}

/// `a * b`, or a validation error naming `what` when the result does not fit.
pub fn checked_mul(what: &str, a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(what))
}

/// Sum of `values`, failing instead of overflowing.
pub fn checked_sum(what: &str, values: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, v| checked_add(what, total, v))
}

/// `a + b` for counts.
pub fn checked_count(what: &str, a: u32, b: u32) -> Result<u32> {
    a.checked_add(b).ok_or_else(|| overflow(what))
}
