//! Per-client rate limiting using the token bucket algorithm.
//!
//! Two key extractors are available: the socket peer address for direct
//! deployments, and `X-Forwarded-For` / `X-Real-IP` / `Forwarded` behind a
//! trusted reverse proxy. [`apply`] picks one from configuration.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Requests per second and burst size.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Visitor-facing routes: redirects and reports.
pub const PUBLIC: Quota = Quota {
    per_second: 2,
    burst_size: 100,
};

/// Link management and administrator routes.
pub const SECURE: Quota = Quota {
    per_second: 1,
    burst_size: 10,
};

fn governor<K>(
    extractor: K,
    quota: Quota,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(extractor)
            .per_second(quota.per_second)
            .burst_size(quota.burst_size)
            .finish()
            .expect("rate limit quota must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter keyed by the socket peer address.
///
/// Requires the server to be started with connect info.
pub fn peer_layer(
    quota: Quota,
) -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    governor(PeerIpKeyExtractor, quota)
}

/// Rate limiter keyed by the client address reported by a reverse proxy.
pub fn proxy_layer(
    quota: Quota,
) -> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    governor(SmartIpKeyExtractor, quota)
}

/// Layers `router` with the limiter matching the deployment.
///
/// # Example
///
/// ```rust,ignore
/// let public = rate_limit::apply(public_routes(), rate_limit::PUBLIC, behind_proxy);
/// ```
pub fn apply<S>(router: Router<S>, quota: Quota, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(proxy_layer(quota))
    } else {
        router.layer(peer_layer(quota))
    }
}
