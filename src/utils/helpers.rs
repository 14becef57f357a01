//! Helper functions and utilities
//!
//! Input normalization and validation shared by the request models.

use chrono::NaiveDate;

use crate::utils::errors::{CampBarError, Result};

/// Trim `value` and require it to be non-empty and at most `max_length` characters
pub fn require_text(field: &str, value: &str, max_length: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CampBarError::Validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_length {
        return Err(CampBarError::Validation(format!(
            "{} must be at most {} characters",
            field, max_length
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional text, mapping blank input to `None`
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A range may be a single day but must not end before it starts
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(CampBarError::Validation(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}

/// Generate a random uppercase alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Escape `%`, `_` and `\` for use inside an ILIKE pattern
pub fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
