//! Syntax rules for user-supplied custom codes.
//!
//! A short code becomes a URL path segment, so only `[A-Za-z0-9-]` is
//! accepted. Anything that would need escaping (`/`, `?`, `#`, whitespace,
//! non-ASCII) is rejected outright.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

pub const MIN_CODE_LENGTH: usize = 3;
pub const MAX_CODE_LENGTH: usize = 50;

/// Same pattern as the `links_short_code_format` table constraint.
static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]{3,50}$").unwrap());

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Returns true iff `code` is 3 to 50 characters of `[A-Za-z0-9-]`.
pub fn validate(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

/// Like [`validate`], but reports which rule failed.
///
/// # Errors
///
/// Returns [`AppError::InvalidCode`] on the first violated rule.
pub fn check(code: &str) -> Result<(), AppError> {
    let length = code.chars().count();
    if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
        return Err(AppError::invalid_code(
            format!("Custom code must be {MIN_CODE_LENGTH}-{MAX_CODE_LENGTH} characters"),
            json!({ "provided_length": length }),
        ));
    }

    if let Some(bad) = code.chars().find(|c| !is_code_char(*c)) {
        return Err(AppError::invalid_code(
            "Custom code can only contain letters, digits, and hyphens",
            json!({ "code": code, "invalid_char": bad.to_string() }),
        ));
    }

    Ok(())
}
