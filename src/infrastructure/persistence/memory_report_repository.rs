//! In-process report repository.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::entities::{NewReport, Report};
use crate::domain::repositories::ReportRepository;
use crate::error::AppError;

#[derive(Default)]
pub struct MemoryReportRepository {
    reports: Mutex<Vec<Report>>,
}

impl MemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored report, oldest first.
    pub async fn all(&self) -> Vec<Report> {
        self.reports.lock().await.clone()
    }
}

#[async_trait]
impl ReportRepository for MemoryReportRepository {
    async fn record(&self, report: NewReport) -> Result<Report, AppError> {
        let mut reports = self.reports.lock().await;

        let stored = Report {
            id: reports.len() as i64 + 1,
            short_code: report.short_code,
            reason: report.reason,
            created_at: Utc::now(),
        };
        reports.push(stored.clone());

        Ok(stored)
    }

    async fn count_for_code(&self, code: &str) -> Result<i64, AppError> {
        let reports = self.reports.lock().await;

        Ok(reports.iter().filter(|r| r.short_code == code).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_assigns_sequential_ids() {
        let repo = MemoryReportRepository::new();

        let first = repo
            .record(NewReport {
                short_code: "abc".to_string(),
                reason: "spam".to_string(),
            })
            .await
            .unwrap();
        let second = repo
            .record(NewReport {
                short_code: "xyz".to_string(),
                reason: "malware".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.count_for_code("abc").await.unwrap(), 1);
        assert_eq!(repo.count_for_code("nope").await.unwrap(), 0);
        assert_eq!(repo.all().await.len(), 2);
    }
}
