//! Validation helpers
//!
//! This module contains helper functions for data validation and type
//! conversion shared by the request DTOs and services.

use chrono::NaiveDate;
use serde::Serialize;
use validator::ValidationError;

/// Validate phone number format (basic)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 7 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validate that a value is strictly positive
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validate that an optional end date is not before the start date
pub fn validate_date_range(from: NaiveDate, to: Option<NaiveDate>) -> Result<(), ValidationError> {
    if let Some(to) = to {
        if to < from {
            let mut error = ValidationError::new("date_range");
            error.add_param("from".into(), &from.to_string());
            error.add_param("to".into(), &to.to_string());
            return Err(error);
        }
    }
    Ok(())
}

/// Comparison key for registration and chassis numbers: trimmed and
/// upper-cased, `None` when blank.
pub fn identifier_key(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_uppercase)
}
