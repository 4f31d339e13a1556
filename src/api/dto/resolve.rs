//! DTO for interstitial redirect pages.

use serde::{Deserialize, Serialize};

use crate::domain::entities::RedirectType;

/// Descriptor the presentation layer renders for timed and ad-gated links.
///
/// The visit has already been counted when this is returned.
#[derive(Debug, Serialize, Deserialize)]
pub struct InterstitialResponse {
    pub code: String,
    pub redirect_type: RedirectType,
    /// Current state machine state (`timed` or `ad_gate`).
    pub state: String,
    pub destination: String,
    pub title: Option<String>,
    /// Seconds before a timed redirect fires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<u32>,
    /// Seconds between "ad viewed" and the redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_seconds: Option<u64>,
}
