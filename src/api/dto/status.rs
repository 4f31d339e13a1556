//! DTO for the administrator status endpoint.

use serde::Deserialize;

use crate::domain::entities::LinkStatus;

/// Request body for `PUT /api/admin/links/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: LinkStatus,
}
