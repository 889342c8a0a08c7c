//! Field validation shared by users and their properties.
//!
//! Usernames and property keys share one character set: ASCII letters, digits and
//! underscore, at most 64 characters.

use std::sync::LazyLock;

use regex::Regex;
use validator::Validate;

use crate::error::Result;

/// Letters, digits and underscore only.
pub static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("identifier pattern is valid"));

/// The user-supplied columns of a new account.
#[derive(Debug, Validate)]
pub struct UserFields {
    #[validate(length(min = 1, max = 64), regex(path = *IDENTIFIER_RE, code = "invalid"))]
    pub username: String,
    #[validate(length(max = 64))]
    pub nickname: String,
}

#[derive(Debug, Validate)]
struct PropertyKey {
    #[validate(length(min = 1, max = 64), regex(path = *IDENTIFIER_RE, code = "invalid"))]
    key: String,
}

/// Checks a property key against the identifier rules.
pub fn validate_property_key(key: &str) -> Result<()> {
    PropertyKey { key: key.to_owned() }.validate()?;
    Ok(())
}
