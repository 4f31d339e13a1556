#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use linkdash::api::routes::{admin_routes, link_routes, public_routes};
use linkdash::application::services::{AdminAuth, CreateLink};
use linkdash::domain::entities::{Link, LinkStatus, RedirectType};
use linkdash::domain::report_event::ReportEvent;
use linkdash::infrastructure::persistence::MemoryLinkRepository;
use linkdash::state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "https://s.example.com";
pub const ADMIN_SECRET: &str = "test-signing-secret";
pub const ADMIN_TOKEN: &str = "test-admin-token";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub links: Arc<MemoryLinkRepository>,
    pub reports: mpsc::Receiver<ReportEvent>,
}

pub fn admin_auth() -> AdminAuth {
    let digest = AdminAuth::new(ADMIN_SECRET.to_string(), None)
        .unwrap()
        .digest(ADMIN_TOKEN)
        .unwrap();
    AdminAuth::new(ADMIN_SECRET.to_string(), Some(&digest)).unwrap()
}

pub fn create_test_state(
    report_capacity: usize,
) -> (
    AppState,
    Arc<MemoryLinkRepository>,
    mpsc::Receiver<ReportEvent>,
) {
    let links = Arc::new(MemoryLinkRepository::new());
    let (tx, rx) = mpsc::channel(report_capacity);

    let state = AppState::new(links.clone(), tx, admin_auth(), BASE_URL);

    (state, links, rx)
}

/// Full route tree without rate limiting, so no connect info is needed.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .nest("/api", link_routes().merge(admin_routes(state.clone())))
        .with_state(state)
}

pub fn spawn_app() -> TestApp {
    let (state, links, reports) = create_test_state(100);
    let server = TestServer::new(test_router(state.clone())).unwrap();

    TestApp {
        server,
        state,
        links,
        reports,
    }
}

pub async fn create_link(
    state: &AppState,
    url: &str,
    redirect_type: RedirectType,
    custom_code: Option<&str>,
    owner: Option<&str>,
) -> Link {
    state
        .link_service
        .create_link(CreateLink {
            original_url: url.to_string(),
            title: None,
            redirect_type,
            custom_code: custom_code.map(str::to_string),
            owner: owner.map(str::to_string),
        })
        .await
        .unwrap()
}

pub async fn set_status(state: &AppState, link: &Link, status: LinkStatus) -> Link {
    state.link_service.set_status(link.id, status).await.unwrap()
}
