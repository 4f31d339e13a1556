//! Repository trait for abuse reports.

use crate::domain::entities::{NewReport, Report};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only storage for abuse reports.
///
/// Reports are written by the background report worker, never on the
/// request path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persists a report.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transient`] on storage errors.
    async fn record(&self, report: NewReport) -> Result<Report, AppError>;

    /// Counts reports filed against a short code.
    async fn count_for_code(&self, code: &str) -> Result<i64, AppError>;
}
