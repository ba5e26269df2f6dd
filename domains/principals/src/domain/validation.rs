//! Validation helpers for user and group names

use regex::Regex;

lazy_static::lazy_static! {
    /// Principal name validation regex
    /// Letters, digits, underscore, hyphen, dot and inner spaces
    pub static ref PRINCIPAL_NAME_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_.\-]([A-Za-z0-9_.\- ]*[A-Za-z0-9_.\-])?$").unwrap();
}

/// Maximum user or group name length
pub const MAX_PRINCIPAL_NAME_LEN: usize = 128;

/// Validate a user or group name according to the rules
pub fn validate_principal_name(name: &str) -> bool {
    name.len() <= MAX_PRINCIPAL_NAME_LEN && PRINCIPAL_NAME_REGEX.is_match(name)
}
