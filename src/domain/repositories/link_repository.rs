//! Repository trait for link persistence.

use crate::domain::entities::{Link, LinkPatch, LinkStatus, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Durable storage for links.
///
/// The two operations that race in practice are atomic at this layer:
/// code allocation ([`Self::insert_if_absent`]) and click accounting
/// ([`Self::increment_clicks`]). Callers never read-then-write either one.
///
/// Records are never removed, so a short code stays allocated for the
/// lifetime of the store, including after soft deletion.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts `new_link` unless its short code was ever allocated.
    ///
    /// Returns `Ok(None)` on a code conflict. The check and the insert are a
    /// single atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transient`] on storage errors.
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Option<Link>, AppError>;

    /// Point lookup by short code, regardless of status.
    ///
    /// A committed insert is visible to the next lookup.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Point lookup by id, regardless of status.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError>;

    /// Atomically adds one click to an active link and returns the updated
    /// record. The status check and the increment are one step.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id and
    /// [`AppError::Unavailable`] if the link is not active. Nothing is
    /// counted in either case.
    async fn increment_clicks(&self, id: Uuid) -> Result<Link, AppError>;

    /// Applies a partial edit to an active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id and
    /// [`AppError::Unavailable`] if the link is not active.
    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, AppError>;

    /// Moves a link to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id and
    /// [`AppError::InvalidTransition`] if the link is already deleted.
    async fn set_status(&self, id: Uuid, status: LinkStatus) -> Result<Link, AppError>;

    /// Lists an account's active links, newest first.
    async fn list_active_by_owner(&self, owner: &str) -> Result<Vec<Link>, AppError>;

    /// Checks that the backing store answers queries.
    async fn health_check(&self) -> bool;
}
