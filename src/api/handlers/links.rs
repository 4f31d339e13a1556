//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest,
};
use crate::application::services::CreateLink;
use crate::domain::entities::{Link, LinkPatch};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_owner::{ACCOUNT_HEADER, extract_owner_from_headers};

fn to_response(state: &AppState, link: Link) -> LinkResponse {
    let short_url = state
        .link_service
        .get_short_url(&state.base_url, &link.short_code);
    LinkResponse::new(link, short_url)
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "example.com/page",
///   "title": "Landing page",       // optional
///   "redirect_type": "timer",      // direct (default) | timer | ad
///   "custom_code": "my-link"       // optional
/// }
/// ```
///
/// The link is owned by the account in `X-Account-Id`, if present.
///
/// # Errors
///
/// - 400 `validation_error` / `invalid_code`
/// - 409 `code_taken` if the custom code was ever allocated
/// - 503 `code_exhausted` / `transient_error` (retryable)
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;
    let owner = extract_owner_from_headers(&headers)?;

    let link = state
        .link_service
        .create_link(CreateLink {
            original_url: payload.original_url,
            title: payload.title,
            redirect_type: payload.redirect_type,
            custom_code: payload.custom_code,
            owner,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// Lists the caller's active links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// # Errors
///
/// Returns 401 Unauthorized without an `X-Account-Id` header.
pub async fn list_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LinkListResponse>, AppError> {
    let owner = extract_owner_from_headers(&headers)?.ok_or_else(|| {
        AppError::unauthorized(
            "Account required",
            json!({ "header": ACCOUNT_HEADER }),
        )
    })?;

    let items: Vec<_> = state
        .link_service
        .list_links(&owner)
        .await?
        .into_iter()
        .map(|link| to_response(&state, link))
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Returns one of the caller's links, in any status.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LinkResponse>, AppError> {
    let owner = extract_owner_from_headers(&headers)?;
    let link = state
        .link_service
        .get_owned_link(id, owner.as_deref())
        .await?;

    Ok(Json(to_response(&state, link)))
}

/// Partially updates title and/or destination.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// # Request Body
///
/// ```json
/// {
///   "title": null,                      // clears the title
///   "original_url": "new.example.com"   // scheme added if missing
/// }
/// ```
///
/// Code, redirect type, clicks and status never change here.
///
/// # Errors
///
/// - 403 if the caller doesn't own the link
/// - 404 if it doesn't exist
/// - 410 if it is suspended or deleted
pub async fn update_link_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;
    let owner = extract_owner_from_headers(&headers)?;

    let patch = LinkPatch {
        title: payload.title,
        original_url: payload.original_url,
    };

    let link = state
        .link_service
        .update_link(id, owner.as_deref(), patch)
        .await?;

    Ok(Json(to_response(&state, link)))
}

/// Soft-deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// The record stays, its code is never reissued, and visits return 410 Gone.
///
/// # Errors
///
/// - 403 if the caller doesn't own the link
/// - 404 if it doesn't exist
/// - 409 if it is already deleted
pub async fn delete_link_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let owner = extract_owner_from_headers(&headers)?;

    state
        .link_service
        .delete_link(id, owner.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
