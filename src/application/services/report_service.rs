//! Fire-and-forget abuse reporting.

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::entities::MAX_REASON_CHARS;
use crate::domain::report_event::ReportEvent;
use crate::error::AppError;
use crate::utils::code_validator;

/// Queues abuse reports for the background report worker.
///
/// Filing never waits on storage. When the queue is full the report is
/// dropped with a warning and the caller still sees success.
#[derive(Clone)]
pub struct ReportService {
    sender: mpsc::Sender<ReportEvent>,
}

impl ReportService {
    pub fn new(sender: mpsc::Sender<ReportEvent>) -> Self {
        Self { sender }
    }

    /// Files a report against `code`.
    ///
    /// The code is checked for syntax only. Reports against unknown or
    /// unavailable codes are accepted.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidCode`] if `code` is malformed
    /// - [`AppError::Validation`] if `reason` is blank or longer than 500
    ///   characters
    pub fn report_link(&self, code: &str, reason: &str) -> Result<(), AppError> {
        code_validator::check(code)?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::bad_request(
                "Report reason is required",
                json!({ "field": "reason" }),
            ));
        }

        let length = reason.chars().count();
        if length > MAX_REASON_CHARS {
            return Err(AppError::bad_request(
                format!("Report reason must be at most {MAX_REASON_CHARS} characters"),
                json!({ "provided_length": length }),
            ));
        }

        match self.sender.try_send(ReportEvent::new(code, reason)) {
            Ok(()) => debug!(code, "Report queued"),
            Err(TrySendError::Full(event)) => {
                warn!(code = %event.code, "Report queue full, dropping report");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(code = %event.code, "Report worker stopped, dropping report");
            }
        }

        Ok(())
    }

    /// Returns true while the report worker is still receiving.
    pub fn is_queue_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Free slots in the report queue.
    pub fn available_capacity(&self) -> usize {
        self.sender.capacity()
    }
}
