//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Links, code allocation, click accounting
//! - [`ReportRepository`] - Abuse reports
//!
//! # Testing
//!
//! See `tests/repository_link.rs` and `tests/concurrency.rs`.

pub mod link_repository;
pub mod report_repository;

pub use link_repository::LinkRepository;
pub use report_repository::ReportRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use report_repository::MockReportRepository;
