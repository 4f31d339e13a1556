//! DTOs for abuse reports.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /{code}/report`.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(min = 1, message = "Report reason is required"))]
    pub reason: String,
}

/// Acknowledgement returned with `202 Accepted`.
///
/// Acceptance doesn't mean the report was stored; persistence happens in the
/// background.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportAccepted {
    pub code: String,
    pub accepted: bool,
}
