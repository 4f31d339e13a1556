//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_service;
pub mod report_service;
pub mod resolver_service;
pub mod visit_session;

pub use auth_service::AdminAuth;
pub use link_service::{CreateLink, LinkService};
pub use report_service::ReportService;
pub use resolver_service::LinkResolver;
pub use visit_session::{SessionEnd, VisitSession, VisitorSignal};
