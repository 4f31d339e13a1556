//! Link creation, editing and lifecycle service.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{
    Link, LinkPatch, LinkStatus, MAX_TITLE_CHARS, NewLink, RedirectType,
};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::code_validator;
use crate::utils::url_normalizer::normalize_destination;

/// Attempts at allocating a random code before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Codes that would be shadowed by fixed routes.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Input for [`LinkService::create_link`].
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub original_url: String,
    pub title: Option<String>,
    pub redirect_type: RedirectType,
    /// Explicit code requested by the user. `None` means generate one.
    pub custom_code: Option<String>,
    pub owner: Option<String>,
}

/// Service for creating and managing links.
///
/// Input is validated before anything is written. Code allocation goes
/// through the repository's atomic insert-if-absent, never through a
/// separate existence check.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
}

impl LinkService {
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self { link_repository }
    }

    /// Creates a short link.
    ///
    /// # Code Allocation
    ///
    /// - `custom_code` present: validated, then inserted as-is; a conflict is
    ///   reported, never replaced with another code
    /// - otherwise: a random code is generated, retrying on conflict up to
    ///   [`MAX_GENERATION_ATTEMPTS`] times
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty/unparseable URL or a title over
    ///   100 characters
    /// - [`AppError::InvalidCode`] if the custom code fails validation
    /// - [`AppError::CodeTaken`] if the custom code was ever allocated
    /// - [`AppError::CodeExhausted`] if every generated candidate collided
    /// - [`AppError::Transient`] on storage errors
    pub async fn create_link(&self, request: CreateLink) -> Result<Link, AppError> {
        let original_url = normalize_destination(&request.original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;
        let title = normalize_title(request.title)?;

        if let Some(code) = request.custom_code {
            check_custom_code(&code)?;

            let new_link = NewLink {
                id: Uuid::new_v4(),
                short_code: code.clone(),
                original_url,
                title,
                redirect_type: request.redirect_type,
                owner: request.owner,
            };

            let link = self
                .link_repository
                .insert_if_absent(new_link)
                .await?
                .ok_or(AppError::CodeTaken { code })?;

            info!(code = %link.short_code, redirect_type = %link.redirect_type, "Link created");
            return Ok(link);
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let new_link = NewLink {
                id: Uuid::new_v4(),
                short_code: generate_code(),
                original_url: original_url.clone(),
                title: title.clone(),
                redirect_type: request.redirect_type,
                owner: request.owner.clone(),
            };
            let candidate = new_link.short_code.clone();

            match self.link_repository.insert_if_absent(new_link).await? {
                Some(link) => {
                    info!(
                        code = %link.short_code,
                        redirect_type = %link.redirect_type,
                        "Link created"
                    );
                    return Ok(link);
                }
                None => warn!(attempt, code = %candidate, "Generated code collision, retrying"),
            }
        }

        Err(AppError::CodeExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link(&self, id: Uuid) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| link_not_found(id))
    }

    /// Retrieves a link by short code, in any status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link carries this code.
    pub async fn get_link_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })
    }

    /// Lists the requester's active links, newest first.
    pub async fn list_links(&self, owner: &str) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_active_by_owner(owner).await
    }

    /// Edits title and/or destination of an active link owned by `requester`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the link doesn't exist
    /// - [`AppError::Forbidden`] if `requester` doesn't own it
    /// - [`AppError::Unavailable`] if it is suspended or deleted
    /// - [`AppError::Validation`] for an empty patch, bad URL or long title
    pub async fn update_link(
        &self,
        id: Uuid,
        requester: Option<&str>,
        patch: LinkPatch,
    ) -> Result<Link, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({ "fields": ["title", "original_url"] }),
            ));
        }

        let patch = LinkPatch {
            title: match patch.title {
                Some(title) => Some(normalize_title(title)?),
                None => None,
            },
            original_url: match patch.original_url {
                Some(url) => Some(normalize_destination(&url).map_err(|e| {
                    AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
                })?),
                None => None,
            },
        };

        self.get_owned_link(id, requester).await?;

        let link = self.link_repository.update(id, patch).await?;
        info!(code = %link.short_code, "Link updated");
        Ok(link)
    }

    /// Soft-deletes a link owned by `requester`. The code is never reissued.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the link doesn't exist
    /// - [`AppError::Forbidden`] if `requester` doesn't own it
    /// - [`AppError::InvalidTransition`] if it is already deleted
    pub async fn delete_link(&self, id: Uuid, requester: Option<&str>) -> Result<Link, AppError> {
        self.get_owned_link(id, requester).await?;
        self.set_status(id, LinkStatus::Deleted).await
    }

    /// Moves a link to a new status (administrator path, no ownership check).
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the link doesn't exist
    /// - [`AppError::InvalidTransition`] if it is deleted
    pub async fn set_status(&self, id: Uuid, status: LinkStatus) -> Result<Link, AppError> {
        let link = self.link_repository.set_status(id, status).await?;
        info!(code = %link.short_code, status = %link.status, "Link status changed");
        Ok(link)
    }

    pub async fn health_check(&self) -> bool {
        self.link_repository.health_check().await
    }

    /// Builds the public short URL for a code.
    pub fn get_short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    /// Retrieves a link on behalf of its owner.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] if it doesn't exist, [`AppError::Forbidden`] if
    /// `requester` doesn't own it. Anonymous links are owned by nobody.
    pub async fn get_owned_link(
        &self,
        id: Uuid,
        requester: Option<&str>,
    ) -> Result<Link, AppError> {
        let link = self.get_link(id).await?;

        if !link.is_owned_by(requester) {
            return Err(AppError::forbidden(
                "Link belongs to another account",
                json!({ "id": id }),
            ));
        }

        Ok(link)
    }
}

fn check_custom_code(code: &str) -> Result<(), AppError> {
    code_validator::check(code)?;

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::invalid_code(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

/// Trims the title, maps blank to `None` and enforces the length cap.
fn normalize_title(title: Option<String>) -> Result<Option<String>, AppError> {
    let Some(title) = title else {
        return Ok(None);
    };

    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let length = trimmed.chars().count();
    if length > MAX_TITLE_CHARS {
        return Err(AppError::bad_request(
            format!("Title must be at most {MAX_TITLE_CHARS} characters"),
            json!({ "provided_length": length }),
        ));
    }

    Ok(Some(trimmed.to_string()))
}

fn link_not_found(id: Uuid) -> AppError {
    AppError::not_found("Link not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use mockall::Sequence;

    fn stored(new_link: NewLink) -> Link {
        new_link.into_link(Utc::now())
    }

    fn existing_link(owner: Option<&str>, status: LinkStatus) -> Link {
        Link {
            id: Uuid::new_v4(),
            short_code: "existing".to_string(),
            original_url: "https://example.com".to_string(),
            title: None,
            redirect_type: RedirectType::Direct,
            clicks: 3,
            status,
            owner: owner.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn request(url: &str) -> CreateLink {
        CreateLink {
            original_url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_link_generates_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_if_absent()
            .withf(|l| l.short_code.len() == 8 && code_validator::validate(&l.short_code))
            .times(1)
            .returning(|l| Ok(Some(stored(l))));

        let service = LinkService::new(Arc::new(repo));
        let link = service.create_link(request("https://example.com")).await.unwrap();

        assert_eq!(link.clicks, 0);
        assert_eq!(link.status, LinkStatus::Active);
        assert_eq!(link.redirect_type, RedirectType::Direct);
    }

    #[tokio::test]
    async fn test_create_link_prepends_scheme() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_if_absent()
            .withf(|l| l.original_url == "http://example.com")
            .times(1)
            .returning(|l| Ok(Some(stored(l))));

        let service = LinkService::new(Arc::new(repo));
        let link = service.create_link(request("example.com")).await.unwrap();

        assert_eq!(link.original_url, "http://example.com");
    }

    #[tokio::test]
    async fn test_create_link_retries_generated_collisions() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();
        repo.expect_insert_if_absent()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|l| Ok(Some(stored(l))));

        let service = LinkService::new(Arc::new(repo));
        let result = service.create_link(request("https://example.com")).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_exhausts_after_five_collisions() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_if_absent()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo));
        let err = service
            .create_link(request("https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CodeExhausted { attempts: 5 }));
    }

    #[tokio::test]
    async fn test_create_link_with_custom_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_if_absent()
            .withf(|l| l.short_code == "my-link")
            .times(1)
            .returning(|l| Ok(Some(stored(l))));

        let service = LinkService::new(Arc::new(repo));
        let link = service
            .create_link(CreateLink {
                custom_code: Some("my-link".to_string()),
                ..request("https://example.com")
            })
            .await
            .unwrap();

        assert_eq!(link.short_code, "my-link");
    }

    #[tokio::test]
    async fn test_custom_code_conflict_is_not_substituted() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo));
        let err = service
            .create_link(CreateLink {
                custom_code: Some("taken".to_string()),
                ..request("https://example.com")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CodeTaken { ref code } if code == "taken"));
    }

    #[tokio::test]
    async fn test_invalid_custom_code_never_reaches_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_if_absent().times(0);

        let service = LinkService::new(Arc::new(repo));

        for code in ["ab", "my link", "a/b", "health"] {
            let err = service
                .create_link(CreateLink {
                    custom_code: Some(code.to_string()),
                    ..request("https://example.com")
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidCode { .. }), "{code}");
        }
    }

    #[tokio::test]
    async fn test_long_title_rejected_before_insert() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert_if_absent().times(0);

        let service = LinkService::new(Arc::new(repo));
        let err = service
            .create_link(CreateLink {
                title: Some("t".repeat(101)),
                ..request("https://example.com")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(repo));

        let err = service.create_link(request("  ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_requires_ownership() {
        let link = existing_link(Some("alice"), LinkStatus::Active);
        let id = link.id;

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_update().times(0);

        let service = LinkService::new(Arc::new(repo));
        let patch = LinkPatch {
            title: Some(Some("new".to_string())),
            original_url: None,
        };

        let err = service
            .update_link(id, Some("mallory"), patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        let err = service.update_link(id, None, patch).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_formats_new_url() {
        let link = existing_link(Some("alice"), LinkStatus::Active);
        let id = link.id;
        let found = link.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_update()
            .withf(|_, p| p.original_url.as_deref() == Some("http://new.example"))
            .times(1)
            .returning(move |_, p| {
                let mut updated = link.clone();
                p.apply_to(&mut updated);
                Ok(updated)
            });

        let service = LinkService::new(Arc::new(repo));
        let updated = service
            .update_link(
                id,
                Some("alice"),
                LinkPatch {
                    title: None,
                    original_url: Some("new.example".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.original_url, "http://new.example");
        assert_eq!(updated.clicks, 3);
    }

    #[tokio::test]
    async fn test_empty_patch_rejected() {
        let repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(repo));

        let err = service
            .update_link(Uuid::new_v4(), Some("alice"), LinkPatch::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_sets_deleted_status() {
        let link = existing_link(Some("alice"), LinkStatus::Active);
        let id = link.id;
        let found = link.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_set_status()
            .withf(|_, s| *s == LinkStatus::Deleted)
            .times(1)
            .returning(move |_, s| {
                let mut updated = link.clone();
                updated.status = s;
                Ok(updated)
            });

        let service = LinkService::new(Arc::new(repo));
        let deleted = service.delete_link(id, Some("alice")).await.unwrap();

        assert_eq!(deleted.status, LinkStatus::Deleted);
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo));
        let err = service.get_link(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_get_short_url() {
        let service = LinkService::new(Arc::new(MockLinkRepository::new()));

        assert_eq!(
            service.get_short_url("https://s.example.com/", "abc"),
            "https://s.example.com/abc"
        );
    }
}
