//! Repository implementations.
//!
//! PostgreSQL implementations use SQLx runtime queries mapped through
//! `FromRow`; the in-memory ones back `STORAGE=memory` and the test suite.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] / [`MemoryLinkRepository`] - Links
//! - [`PgReportRepository`] / [`MemoryReportRepository`] - Abuse reports

pub mod memory_link_repository;
pub mod memory_report_repository;
pub mod pg_link_repository;
pub mod pg_report_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use memory_report_repository::MemoryReportRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_report_repository::PgReportRepository;
