//! Random short code generation.
//!
//! Codes are drawn from the same alphabet custom codes are validated against,
//! so a generated code always passes [`crate::utils::code_validator::validate`].
//! Uniqueness is not checked here; the link store enforces it at insert time.

use rand::Rng;

/// Alphabet shared by generated and custom codes: `[A-Za-z0-9-]`.
pub const CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-";

/// Length of generated codes.
///
/// 63^8 is about 2.5e14 combinations, so collisions stay rare at scale and
/// the bounded retry in the link service is almost never exercised.
pub const GENERATED_CODE_LENGTH: usize = 8;

/// Generates a random short code of [`GENERATED_CODE_LENGTH`] characters.
///
/// Uses the thread-local CSPRNG (`rand::rng()`), which is seeded from the OS
/// and never shared between threads, so concurrent callers need no locking.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 8);
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..GENERATED_CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
