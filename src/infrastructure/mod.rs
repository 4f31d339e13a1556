//! Infrastructure layer for external integrations.
//!
//! Implements the storage traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL and in-memory repositories

pub mod persistence;
