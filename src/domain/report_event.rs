//! Report event model for fire-and-forget abuse reports.

/// An in-memory abuse report waiting to be persisted.
///
/// Created on the request path and handed to
/// [`crate::domain::report_worker::run_report_worker`] through a bounded
/// channel, so filing a report never waits on storage and never touches the
/// resolution path.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEvent {
    pub code: String,
    pub reason: String,
}

impl ReportEvent {
    pub fn new(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_event_creation() {
        let event = ReportEvent::new("abc123", "spam");

        assert_eq!(event.code, "abc123");
        assert_eq!(event.reason, "spam");
    }
}
