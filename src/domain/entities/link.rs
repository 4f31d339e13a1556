//! Link entity representing a shortened URL and its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Visitor experience selected when the link is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectType {
    /// Immediate redirect, no interstitial.
    #[default]
    Direct,
    /// Countdown page before the redirect.
    Timer,
    /// Advertisement interstitial the visitor skips or acknowledges.
    Ad,
}

impl RedirectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Timer => "timer",
            Self::Ad => "ad",
        }
    }
}

impl fmt::Display for RedirectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedirectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "timer" => Ok(Self::Timer),
            "ad" => Ok(Self::Ad),
            other => Err(format!("unknown redirect type '{other}'")),
        }
    }
}

/// Lifecycle status of a link.
///
/// Only [`LinkStatus::Active`] links resolve. `Suspended` is reversible,
/// `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Suspended,
    Deleted,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }

    /// Returns true if a link in this status may move to `next`.
    ///
    /// Nothing leaves `Deleted`.
    pub fn can_transition_to(&self, next: LinkStatus) -> bool {
        !matches!((self, next), (Self::Deleted, _))
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "deleted" => Ok(Self::Deleted),
            other => Err(format!("unknown link status '{other}'")),
        }
    }
}

/// A shortened link with its counters and lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: Uuid,
    pub short_code: String,
    pub original_url: String,
    pub title: Option<String>,
    pub redirect_type: RedirectType,
    pub clicks: i64,
    pub status: LinkStatus,
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if visitors can be redirected through this link.
    pub fn is_resolvable(&self) -> bool {
        self.status == LinkStatus::Active
    }

    /// Returns true if `account` owns this link.
    ///
    /// Anonymous links have no owner and match nobody.
    pub fn is_owned_by(&self, account: Option<&str>) -> bool {
        match (self.owner.as_deref(), account) {
            (Some(owner), Some(account)) => owner == account,
            _ => false,
        }
    }
}

/// Input data for inserting a new link.
///
/// The URL is already normalized and the code already validated or generated
/// by the time this reaches a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub id: Uuid,
    pub short_code: String,
    pub original_url: String,
    pub title: Option<String>,
    pub redirect_type: RedirectType,
    pub owner: Option<String>,
}

impl NewLink {
    /// Materializes the record a store commits for this input.
    pub fn into_link(self, created_at: DateTime<Utc>) -> Link {
        Link {
            id: self.id,
            short_code: self.short_code,
            original_url: self.original_url,
            title: self.title,
            redirect_type: self.redirect_type,
            clicks: 0,
            status: LinkStatus::Active,
            owner: self.owner,
            created_at,
        }
    }
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `title: Some(None)` clears the title; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub title: Option<Option<String>>,
    pub original_url: Option<String>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.original_url.is_none()
    }

    /// Applies the patch in place. Never touches code, type, clicks or status.
    pub fn apply_to(&self, link: &mut Link) {
        if let Some(title) = &self.title {
            link.title = title.clone();
        }
        if let Some(url) = &self.original_url {
            link.original_url = url.clone();
        }
    }
}
