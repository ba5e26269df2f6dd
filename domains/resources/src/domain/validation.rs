//! Validation helpers for resource and property names

use regex::Regex;

lazy_static::lazy_static! {
    /// Absolute resource path: segments of allowed characters separated by
    /// single slashes, optionally ending with a slash for folders
    pub static ref RESOURCE_NAME_REGEX: Regex =
        Regex::new(r"^/([A-Za-z0-9_\-.~$]+/)*([A-Za-z0-9_\-.~$]+)?$").unwrap();

    /// Property names: letters, digits, underscore, hyphen and dot
    pub static ref PROPERTY_NAME_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_\-.]{1,64}$").unwrap();
}

/// Maximum resource path length
pub const MAX_RESOURCE_NAME_LEN: usize = 255;

/// Validate an absolute resource name
///
/// Folder names end with `/`; the root folder is `/`. Segments consisting of
/// dots only are rejected so paths cannot escape their parent.
pub fn validate_resource_name(name: &str) -> bool {
    if name.len() > MAX_RESOURCE_NAME_LEN || !RESOURCE_NAME_REGEX.is_match(name) {
        return false;
    }

    !name
        .split('/')
        .any(|segment| !segment.is_empty() && segment.chars().all(|c| c == '.'))
}

/// Validate a property definition name
pub fn validate_property_name(name: &str) -> bool {
    PROPERTY_NAME_REGEX.is_match(name)
}
