//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Link, LinkStatus, RedirectType};

/// Request body for `POST /api/links`.
///
/// `original_url` may omit the scheme; `http://` is prepended. The custom
/// code is checked by the service so that a bad code surfaces as
/// `invalid_code` rather than a generic validation error.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,

    pub title: Option<String>,

    #[serde(default)]
    pub redirect_type: RedirectType,

    pub custom_code: Option<String>,
}

/// Request body for `PATCH /api/links/{id}`.
///
/// # `title` semantics
///
/// - **Absent** → leave unchanged
/// - **`null`** → clear the title
/// - **String** → set it
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub title: Option<Option<String>>,

    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: Option<String>,
}

/// JSON representation of a link.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub title: Option<String>,
    pub redirect_type: RedirectType,
    pub clicks: i64,
    pub status: LinkStatus,
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            short_url,
            original_url: link.original_url,
            title: link.title,
            redirect_type: link.redirect_type,
            clicks: link.clicks,
            status: link.status,
            owner: link.owner,
            created_at: link.created_at,
        }
    }
}

/// Response for `GET /api/links`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_title_absent_null_and_value() {
        let absent: UpdateLinkRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.title, None);

        let cleared: UpdateLinkRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(cleared.title, Some(None));

        let set: UpdateLinkRequest = serde_json::from_str(r#"{"title": "Docs"}"#).unwrap();
        assert_eq!(set.title, Some(Some("Docs".to_string())));
    }

    #[test]
    fn test_create_defaults_to_direct() {
        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"original_url": "example.com"}"#).unwrap();

        assert_eq!(req.redirect_type, RedirectType::Direct);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_unknown_redirect_type() {
        let result = serde_json::from_str::<CreateLinkRequest>(
            r#"{"original_url": "example.com", "redirect_type": "popup"}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_create_rejects_empty_url() {
        let req: CreateLinkRequest = serde_json::from_str(r#"{"original_url": ""}"#).unwrap();

        assert!(req.validate().is_err());
    }
}
