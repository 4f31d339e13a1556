//! Bearer token authentication for the administrator surface.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Authenticates administrator requests.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// The token is checked against the configured HMAC digest
/// (see [`crate::application::services::AdminAuth`]).
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header is
/// missing, malformed, or the token doesn't match.
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    match authenticate(&st, req).await {
        Ok(req) => next.run(req).await,
        Err(err) => {
            let mut response = err.into_response();
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            response
        }
    }
}

async fn authenticate(st: &AppState, req: Request) -> Result<Request, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    st.admin_auth.authenticate(&token)?;

    Ok(Request::from_parts(parts, body))
}
