//! Account identity extraction from HTTP request headers.

use crate::AppError;
use axum::http::HeaderMap;
use serde_json::json;

/// Header set by the fronting identity proxy for signed-in visitors.
pub const ACCOUNT_HEADER: &str = "x-account-id";

const MAX_ACCOUNT_ID_LEN: usize = 128;

/// Extracts the optional account identifier from request headers.
///
/// The identity provider is an external collaborator; the value is treated as
/// an opaque string. A missing or blank header means an anonymous caller.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the header is not valid UTF-8 or is
/// longer than 128 bytes.
pub fn extract_owner_from_headers(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(raw) = headers.get(ACCOUNT_HEADER) else {
        return Ok(None);
    };

    let value = raw
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid account header", json!({})))?
        .trim();

    if value.is_empty() {
        return Ok(None);
    }

    if value.len() > MAX_ACCOUNT_ID_LEN {
        return Err(AppError::bad_request(
            "Account identifier too long",
            json!({ "max_length": MAX_ACCOUNT_ID_LEN }),
        ));
    }

    Ok(Some(value.to_string()))
}
