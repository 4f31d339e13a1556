//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AdminAuth, LinkResolver, LinkService, ReportService};
use crate::domain::report_event::ReportEvent;
use crate::domain::repositories::LinkRepository;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub resolver: Arc<LinkResolver>,
    pub report_service: ReportService,
    pub admin_auth: Arc<AdminAuth>,
    /// Prefix for generated short URLs, without trailing slash.
    pub base_url: String,
}

impl AppState {
    /// Wires the services around one link store and a report queue.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        report_sender: mpsc::Sender<ReportEvent>,
        admin_auth: AdminAuth,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(link_repository.clone())),
            resolver: Arc::new(LinkResolver::new(link_repository)),
            report_service: ReportService::new(report_sender),
            admin_auth: Arc::new(admin_auth),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}
