//! Password hashing for stored credentials
//!
//! Passwords are stored as Argon2id hashes in PHC string format. An account
//! without a password gets an unusable marker instead: a string starting with
//! [`UNUSABLE_PASSWORD_PREFIX`] that no hash can ever match.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};

use crate::error::{AccountError, Result};

/// Prefix marking a stored password that can never be used to log in.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Number of random characters appended to the unusable prefix.
pub const UNUSABLE_PASSWORD_SUFFIX_LENGTH: usize = 40;

/// Hash a password using Argon2id
///
/// # Returns
/// The Argon2 hash string (PHC format), salt included
pub fn hash_password(password: impl AsRef<str>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| AccountError::PasswordHash(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its stored hash.
///
/// Unusable markers and anything that does not parse as a PHC string never verify.
pub fn verify_password(password: impl AsRef<str>, encoded: impl AsRef<str>) -> bool {
    let encoded = encoded.as_ref();
    if !is_password_usable(encoded) {
        return false;
    }

    let Ok(parsed_hash) = PasswordHash::new(encoded) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed_hash)
        .is_ok()
}

/// Produce a fresh unusable password marker.
pub fn make_unusable_password() -> String {
    let suffix: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(UNUSABLE_PASSWORD_SUFFIX_LENGTH)
        .map(char::from)
        .collect();
    format!("{UNUSABLE_PASSWORD_PREFIX}{suffix}")
}

/// False for empty strings and unusable markers.
pub fn is_password_usable(encoded: &str) -> bool {
    !encoded.is_empty() && !encoded.starts_with(UNUSABLE_PASSWORD_PREFIX)
}
