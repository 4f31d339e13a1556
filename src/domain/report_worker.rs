//! Background worker persisting abuse reports.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::entities::NewReport;
use crate::domain::report_event::ReportEvent;
use crate::domain::repositories::ReportRepository;

/// Attempts per report before it is dropped.
const MAX_ATTEMPTS: usize = 3;

/// Drains the report channel until every sender is gone.
///
/// Each report is written with exponential backoff; a report that still
/// fails after [`MAX_ATTEMPTS`] is logged and dropped. Returns the number of
/// reports persisted.
pub async fn run_report_worker(
    mut rx: mpsc::Receiver<ReportEvent>,
    repository: Arc<dyn ReportRepository>,
) -> usize {
    let mut persisted = 0;

    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(25)
            .map(jitter)
            .take(MAX_ATTEMPTS - 1);

        let result = Retry::spawn(strategy, || {
            let repository = repository.clone();
            let report = NewReport {
                short_code: event.code.clone(),
                reason: event.reason.clone(),
            };
            async move { repository.record(report).await }
        })
        .await;

        match result {
            Ok(report) => {
                persisted += 1;
                debug!(code = %report.short_code, id = report.id, "Report persisted");
            }
            Err(e) => {
                error!(code = %event.code, error = %e, "Dropping report after retries");
            }
        }
    }

    info!(persisted, "Report worker stopped");
    persisted
}
