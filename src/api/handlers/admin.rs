//! Administrator handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::status::UpdateStatusRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Moves a link to a new status.
///
/// # Endpoint
///
/// `PUT /api/admin/links/{id}/status` (Bearer token)
///
/// ```json
/// { "status": "suspended" }
/// ```
///
/// Suspension is reversible; deletion is not.
///
/// # Errors
///
/// - 404 if the link doesn't exist
/// - 409 if the link is deleted
pub async fn set_status_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.set_status(id, payload.status).await?;
    let short_url = state
        .link_service
        .get_short_url(&state.base_url, &link.short_code);

    Ok(Json(LinkResponse::new(link, short_url)))
}
