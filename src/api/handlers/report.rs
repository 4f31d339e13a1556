//! Handler for abuse reports.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::report::{ReportAccepted, ReportRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Files an abuse report against a short code.
///
/// # Endpoint
///
/// `POST /{code}/report`
///
/// Fire-and-forget: the report is queued and the response returns at once
/// with 202 Accepted. The link itself is not looked up and its click count
/// is untouched.
///
/// # Errors
///
/// Returns 400 if the code is malformed or the reason is blank or too long.
pub async fn report_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ReportRequest>,
) -> Result<(StatusCode, Json<ReportAccepted>), AppError> {
    payload.validate()?;

    state.report_service.report_link(&code, &payload.reason)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ReportAccepted {
            code,
            accepted: true,
        }),
    ))
}
