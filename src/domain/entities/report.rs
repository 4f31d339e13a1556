//! Abuse report entity.

use chrono::{DateTime, Utc};

/// Maximum report reason length in characters.
pub const MAX_REASON_CHARS: usize = 500;

/// A persisted abuse report against a short code.
#[derive(Debug, Clone)]
pub struct Report {
    pub id: i64,
    pub short_code: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a new report.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub short_code: String,
    pub reason: String,
}
