//! Domain layer: entities, repository contracts and the redirect state machine.
//!
//! Nothing in here depends on HTTP or on a concrete store.
//!
//! # Modules
//!
//! - [`entities`] - Links and reports
//! - [`repositories`] - Storage traits
//! - [`resolution`] - Outcome of resolving a short code
//! - [`redirect_flow`] - Direct / timed / ad-gated redirect state machine
//! - [`report_event`] - Abuse report queued for persistence
//! - [`report_worker`] - Background writer for queued reports
//!
//! # Visit Flow
//!
//! 1. [`crate::application::services::LinkResolver`] looks the code up and
//!    counts the click
//! 2. [`redirect_flow::RedirectFlow::start`] picks the visitor experience
//! 3. The presentation layer (or a
//!    [`crate::application::services::VisitSession`]) feeds signals until the
//!    flow reaches its destination

pub mod entities;
pub mod redirect_flow;
pub mod report_event;
pub mod report_worker;
pub mod repositories;
pub mod resolution;
