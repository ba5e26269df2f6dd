//! Principals domain: users, groups and group flags

pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Group, GroupFlags, User};
pub use domain::validation::validate_principal_name;
