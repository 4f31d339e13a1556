//! Bearer token check for the administrator surface.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Authenticates administrator requests.
///
/// The server never stores the raw token: `ADMIN_TOKEN` holds the hex
/// HMAC-SHA256 digest of it, keyed by `ADMIN_TOKEN_SECRET`. Comparison is
/// constant-time. Without a configured digest every request is refused.
#[derive(Clone)]
pub struct AdminAuth {
    signing_secret: String,
    token_digest: Option<Vec<u8>>,
}

impl AdminAuth {
    /// # Errors
    ///
    /// Returns an error if `token_digest` is not valid hex.
    pub fn new(
        signing_secret: String,
        token_digest: Option<&str>,
    ) -> Result<Self, hex::FromHexError> {
        let token_digest = token_digest.map(hex::decode).transpose()?;

        Ok(Self {
            signing_secret,
            token_digest,
        })
    }

    /// Auth that refuses everything.
    pub fn disabled() -> Self {
        Self {
            signing_secret: String::new(),
            token_digest: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token_digest.is_some()
    }

    fn mac(&self, token: &str) -> Result<HmacSha256, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes()).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid signing key" }))
        })?;
        mac.update(token.as_bytes());
        Ok(mac)
    }

    /// Hex digest to put into `ADMIN_TOKEN` for a raw token.
    pub fn digest(&self, token: &str) -> Result<String, AppError> {
        Ok(hex::encode(self.mac(token)?.finalize().into_bytes()))
    }

    /// Verifies a raw bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if admin access is not configured or
    /// the token doesn't match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let Some(expected) = &self.token_digest else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Admin access is not configured" }),
            ));
        };

        self.mac(token)?.verify_slice(expected).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token" }))
        })
    }
}
