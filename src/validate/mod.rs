//! Validation of raw user input into canonical typed values.
//!
//! Every function is pure and must be called before the corresponding value
//! reaches the store. Errors carry the offending input so the presentation
//! layer can show it back to the user.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::models::PaymentMethod;

/// Maximum length of a transaction description, in characters.
pub const DESCRIPTION_MAX: usize = 200;

/// Maximum length of transaction notes, in characters.
pub const NOTES_MAX: usize = 500;

/// Accepted date input formats, tried in order. The first is the primary
/// format named in error messages.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid date: {0} (use DD/MM/YYYY)")]
    InvalidDate(String),
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("description too long (maximum {max} characters)")]
    DescriptionTooLong { max: usize },
    #[error("notes too long (maximum {max} characters)")]
    NotesTooLong { max: usize },
    #[error("invalid category id: {0}")]
    InvalidCategoryId(String),
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

/// Parses a monetary amount. Fails on non-numeric or non-positive input;
/// the result is rounded to 2 decimal places.
pub fn amount(raw: &str) -> Result<Decimal, ValidationError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))?;
    amount_value(value).map_err(|_| ValidationError::InvalidAmount(raw.to_string()))
}

/// Same rules as [`amount`] for an already-typed value. Used when
/// re-validating partial updates.
pub fn amount_value(value: Decimal) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount(value.to_string()));
    }
    Ok(value.round_dp(2))
}

/// Parses a calendar date from any of the accepted formats; the first
/// successful parse wins. The result carries a midnight time component.
pub fn date(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(trimmed, fmt) {
            if let Some(datetime) = day.and_hms_opt(0, 0, 0) {
                return Ok(datetime);
            }
        }
    }
    Err(ValidationError::InvalidDate(raw.to_string()))
}

/// Trims and bounds-checks a description.
pub fn description(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if trimmed.chars().count() > DESCRIPTION_MAX {
        return Err(ValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX,
        });
    }
    Ok(trimmed.to_string())
}

/// Trims and bounds-checks free-form notes. Empty notes are allowed.
pub fn notes(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > NOTES_MAX {
        return Err(ValidationError::NotesTooLong { max: NOTES_MAX });
    }
    Ok(trimmed.to_string())
}

/// Parses a category identifier. Fails on non-numeric or non-positive input.
pub fn category_id(raw: &str) -> Result<i64, ValidationError> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidCategoryId(raw.to_string()))?;
    if id <= 0 {
        return Err(ValidationError::InvalidCategoryId(raw.to_string()));
    }
    Ok(id)
}

/// Parses a payment method from its symbolic name or display string.
/// Unrecognized input fails rather than falling back to a default.
pub fn payment_method(raw: &str) -> Result<PaymentMethod, ValidationError> {
    PaymentMethod::parse(raw).ok_or_else(|| ValidationError::UnknownPaymentMethod(raw.to_string()))
}
