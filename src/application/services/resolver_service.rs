//! Short code resolution with click accounting.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::repositories::LinkRepository;
use crate::domain::resolution::ResolutionOutcome;
use crate::error::AppError;
use crate::utils::code_validator;

/// Resolves visitor requests for short codes.
///
/// Every `Resolved` outcome corresponds to exactly one atomic click
/// increment. `NotFound` and `Unavailable` outcomes never touch the counter.
pub struct LinkResolver {
    link_repository: Arc<dyn LinkRepository>,
}

impl LinkResolver {
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self { link_repository }
    }

    /// Resolves `code` to an outcome, counting the visit if it resolves.
    ///
    /// Codes that could never have been issued resolve to `NotFound` without
    /// a store lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transient`] if the store fails. No outcome is
    /// produced in that case.
    pub async fn resolve(&self, code: &str) -> Result<ResolutionOutcome, AppError> {
        if !code_validator::validate(code) {
            debug!(code, "Rejected malformed code");
            return Ok(ResolutionOutcome::NotFound);
        }

        let Some(link) = self.link_repository.find_by_code(code).await? else {
            debug!(code, "Code not found");
            return Ok(ResolutionOutcome::NotFound);
        };

        // Fast path only. `increment_clicks` re-checks the status atomically.
        if !link.is_resolvable() {
            debug!(code, status = %link.status, "Code unavailable");
            return Ok(ResolutionOutcome::Unavailable {
                status: link.status,
            });
        }

        match self.link_repository.increment_clicks(link.id).await {
            Ok(link) => {
                debug!(code, clicks = link.clicks, "Code resolved");
                Ok(ResolutionOutcome::Resolved(link))
            }
            Err(AppError::Unavailable { status, .. }) => {
                debug!(code, %status, "Code became unavailable before the click was counted");
                Ok(ResolutionOutcome::Unavailable { status })
            }
            Err(AppError::NotFound { .. }) => {
                error!(code, id = %link.id, "Link vanished between lookup and click increment");
                Ok(ResolutionOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }
}
