//! Handler for short URL visits.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::api::dto::resolve::InterstitialResponse;
use crate::domain::redirect_flow::{AD_GRACE_PERIOD, FlowState, RedirectFlow};
use crate::domain::resolution::ResolutionOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code and starts the visitor's redirect flow.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - **direct**: 307 Temporary Redirect to the destination
/// - **timer**: 200 with an interstitial descriptor carrying `countdown`
/// - **ad**: 200 with an interstitial descriptor carrying `grace_seconds`
///
/// Every successful response has already counted exactly one click.
///
/// # Errors
///
/// - 404 if the code was never issued
/// - 410 if the link is suspended or deleted
/// - 503 if the store is unavailable
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let outcome = state.resolver.resolve(&code).await?;
    let flow = RedirectFlow::start(&outcome);

    let title = match &outcome {
        ResolutionOutcome::Resolved(link) => link.title.clone(),
        _ => None,
    };

    let (countdown, grace_seconds) = match flow.state() {
        FlowState::Destination => {
            let destination = flow.destination().unwrap_or_default();
            return Ok(Redirect::temporary(destination).into_response());
        }
        FlowState::Timed { remaining } => (Some(*remaining), None),
        FlowState::AdGate { .. } => (None, Some(AD_GRACE_PERIOD.as_secs())),
        FlowState::Start | FlowState::Error(_) => {
            return Err(outcome.into_link(&code).err().unwrap_or_else(|| {
                AppError::transient("Redirect flow failed to start", json!({}))
            }));
        }
    };

    let (Some(redirect_type), Some(destination)) =
        (flow.redirect_type(), flow.pending_destination())
    else {
        return Err(AppError::transient(
            "Redirect flow has no destination",
            json!({ "code": code }),
        ));
    };

    Ok(Json(InterstitialResponse {
        destination: destination.to_string(),
        state: flow.state().name().to_string(),
        code,
        redirect_type,
        title,
        countdown,
        grace_seconds,
    })
    .into_response())
}
