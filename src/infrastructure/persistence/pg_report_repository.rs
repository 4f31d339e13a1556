//! PostgreSQL implementation of report repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewReport, Report};
use crate::domain::repositories::ReportRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct ReportRow {
    id: i64,
    short_code: String,
    reason: String,
    created_at: DateTime<Utc>,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Report {
            id: row.id,
            short_code: row.short_code,
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}

pub struct PgReportRepository {
    pool: Arc<PgPool>,
}

impl PgReportRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn record(&self, report: NewReport) -> Result<Report, AppError> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            INSERT INTO link_reports (short_code, reason)
            VALUES ($1, $2)
            RETURNING id, short_code, reason, created_at
            "#,
        )
        .bind(&report.short_code)
        .bind(&report.reason)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn count_for_code(&self, code: &str) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM link_reports WHERE short_code = $1")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}
