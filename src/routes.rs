//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`              - Health check (public)
//! - `GET  /{code}`              - Short link visit (public)
//! - `POST /{code}/report`       - Abuse report (public)
//! - `/api/links*`               - Link management (`X-Account-Id` scoped)
//! - `/api/admin/*`              - Administrator surface (Bearer token)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on the admin group
//! - **Path normalization** - Trailing slash handling

use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{admin_routes, link_routes, public_routes};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let public = rate_limit::apply(public_routes(), rate_limit::PUBLIC, behind_proxy);

    let api = rate_limit::apply(
        link_routes().merge(admin_routes(state.clone())),
        rate_limit::SECURE,
        behind_proxy,
    );

    let router = Router::new()
        .merge(public)
        .nest("/api", api)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
