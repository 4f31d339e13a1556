//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkPatch, LinkStatus, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, short_code, original_url, title, redirect_type, clicks, status, owner, created_at";

#[derive(Debug, FromRow)]
struct LinkRow {
    id: Uuid,
    short_code: String,
    original_url: String,
    title: Option<String>,
    redirect_type: String,
    clicks: i64,
    status: String,
    owner: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for Link {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |e: String| {
            tracing::error!(%id, error = %e, "Corrupt link row");
            AppError::transient("Storage returned an unreadable record", json!({ "id": id }))
        };

        Ok(Link {
            redirect_type: row.redirect_type.parse().map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            id: row.id,
            short_code: row.short_code,
            original_url: row.original_url,
            title: row.title,
            clicks: row.clicks,
            owner: row.owner,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Code uniqueness is enforced by the `links_short_code_key` constraint;
/// soft-deleted rows keep their code forever.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Link::try_from)
            .transpose()
    }
}

fn link_not_found(id: Uuid) -> AppError {
    AppError::not_found("Link not found", json!({ "id": id }))
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (id, short_code, original_url, title, redirect_type, owner)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(new_link.id)
            .bind(&new_link.short_code)
            .bind(&new_link.original_url)
            .bind(&new_link.title)
            .bind(new_link.redirect_type.as_str())
            .bind(&new_link.owner)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Link::try_from)
            .transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1");

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Link::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError> {
        self.fetch_by_id(id).await
    }

    async fn increment_clicks(&self, id: Uuid) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            UPDATE links SET clicks = clicks + 1
            WHERE id = $1 AND status = 'active'
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        if let Some(row) = row {
            return row.try_into();
        }

        match self.fetch_by_id(id).await? {
            None => Err(link_not_found(id)),
            Some(link) => Err(AppError::Unavailable {
                code: link.short_code,
                status: link.status,
            }),
        }
    }

    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            UPDATE links
            SET title = CASE WHEN $2 THEN $3 ELSE title END,
                original_url = COALESCE($4, original_url)
            WHERE id = $1 AND status = 'active'
            RETURNING {LINK_COLUMNS}
            "#
        );

        let (set_title, title) = match patch.title {
            Some(title) => (true, title),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .bind(set_title)
            .bind(title)
            .bind(patch.original_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        if let Some(row) = row {
            return row.try_into();
        }

        match self.fetch_by_id(id).await? {
            None => Err(link_not_found(id)),
            Some(link) => Err(AppError::Unavailable {
                code: link.short_code,
                status: link.status,
            }),
        }
    }

    async fn set_status(&self, id: Uuid, status: LinkStatus) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            UPDATE links SET status = $2
            WHERE id = $1 AND status <> 'deleted'
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?;

        if let Some(row) = row {
            return row.try_into();
        }

        match self.fetch_by_id(id).await? {
            None => Err(link_not_found(id)),
            Some(link) => Err(AppError::InvalidTransition {
                from: link.status,
                to: status,
            }),
        }
    }

    async fn list_active_by_owner(&self, owner: &str) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS} FROM links
            WHERE owner = $1 AND status = 'active'
            ORDER BY created_at DESC
            "#
        );

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(owner)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(Link::try_from)
            .collect()
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
