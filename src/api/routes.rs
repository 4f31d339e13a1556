//! API route configuration.
//!
//! Routers here carry no rate limiting; [`crate::routes::app_router`] layers
//! it per group.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, health_handler,
    list_links_handler, redirect_handler, report_handler, set_status_handler,
    update_link_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// Visitor-facing routes.
///
/// # Endpoints
///
/// - `GET  /health`        - Storage and report queue health
/// - `GET  /{code}`        - Resolve and redirect (or interstitial)
/// - `POST /{code}/report` - Fire-and-forget abuse report
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .route("/{code}/report", post(report_handler))
}

/// Link management routes, scoped to the `X-Account-Id` caller.
///
/// # Endpoints
///
/// - `GET    /links`      - Caller's active links, newest first
/// - `POST   /links`      - Create a link
/// - `GET    /links/{id}` - Fetch one of the caller's links
/// - `PATCH  /links/{id}` - Edit title / destination
/// - `DELETE /links/{id}` - Soft-delete
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
}

/// Administrator routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `PUT /admin/links/{id}/status` - Suspend, reactivate or delete a link
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/links/{id}/status", put(set_status_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}
