//! Destination URL formatting and sanity checks.
//!
//! Formatting is a pure string transform applied once when a URL enters the
//! store: a missing `http://`/`https://` prefix gets `http://` prepended.
//! Stored URLs are never reformatted on read.

use url::Url;

/// Errors returned when a formatted URL still isn't a usable destination.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL has no host")]
    MissingHost,
}

fn has_web_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Prepends `http://` unless the input already starts with a web scheme.
///
/// Surrounding whitespace is trimmed. Idempotent:
/// `format_url(&format_url(u)) == format_url(u)`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_url("example.com"), "http://example.com");
/// assert_eq!(format_url("https://x.com"), "https://x.com");
/// ```
pub fn format_url(input: &str) -> String {
    let trimmed = input.trim();
    if has_web_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Formats `input` and checks the result parses as an absolute URL with a host.
///
/// The formatted string is returned as-is; parsing only validates it.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input,
/// [`UrlNormalizationError::InvalidFormat`] if the result does not parse, and
/// [`UrlNormalizationError::MissingHost`] if it has no host.
pub fn normalize_destination(input: &str) -> Result<String, UrlNormalizationError> {
    if input.trim().is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let formatted = format_url(input);
    let parsed =
        Url::parse(&formatted).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(formatted),
        _ => Err(UrlNormalizationError::MissingHost),
    }
}
