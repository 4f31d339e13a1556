//! Application layer services implementing business logic.
//!
//! Services validate input, enforce ownership and status rules, and call the
//! repository traits. Handlers never talk to repositories directly.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, editing and lifecycle
//! - [`services::resolver_service::LinkResolver`] - Code resolution and click accounting
//! - [`services::report_service::ReportService`] - Fire-and-forget abuse reports
//! - [`services::visit_session::VisitSession`] - Timed and ad-gated redirect driver
//! - [`services::auth_service::AdminAuth`] - Administrator bearer token

pub mod services;
