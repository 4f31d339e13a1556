//! Outcome of resolving a short code.

use serde_json::json;

use crate::domain::entities::{Link, LinkStatus};
use crate::error::AppError;

/// What a visit to a short code resolved to.
///
/// Storage failures are not an outcome; they surface as
/// [`AppError::Transient`] from the resolver instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// No record carries this code.
    NotFound,
    /// The record exists but is suspended or deleted.
    Unavailable { status: LinkStatus },
    /// The record is active and the visit has already been counted.
    /// `link.clicks` includes this visit.
    Resolved(Link),
}

impl ResolutionOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Converts the outcome into the resolved link or the matching error.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for `NotFound`, [`AppError::Unavailable`] for
    /// `Unavailable`.
    pub fn into_link(self, code: &str) -> Result<Link, AppError> {
        match self {
            Self::Resolved(link) => Ok(link),
            Self::NotFound => Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            )),
            Self::Unavailable { status } => Err(AppError::Unavailable {
                code: code.to_string(),
                status,
            }),
        }
    }
}
