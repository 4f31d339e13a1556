//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. Lifecycle rules that are pure functions
//! of an entity's own fields (status transitions, ownership) live next to it.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to a destination
//! - [`Report`] - An abuse report filed against a short code
//!
//! # Design Pattern
//!
//! Separate structs for creation and partial update:
//! - `NewLink`, `NewReport` - For creating new records
//! - `LinkPatch` - For owner edits

pub mod link;
pub mod report;

pub use link::{Link, LinkPatch, LinkStatus, MAX_TITLE_CHARS, NewLink, RedirectType};
pub use report::{MAX_REASON_CHARS, NewReport, Report};
