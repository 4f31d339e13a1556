//! Stateless helpers used across the application.
//!
//! - [`code_generator`] - Random short code generation
//! - [`code_validator`] - Custom short code syntax rules
//! - [`url_normalizer`] - Destination URL formatting
//! - [`extract_owner`] - Account identity from HTTP headers

pub mod code_generator;
pub mod code_validator;
pub mod extract_owner;
pub mod url_normalizer;
