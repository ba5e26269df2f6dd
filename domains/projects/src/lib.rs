//! Projects domain: projects and the project lock/publish lifecycle

pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Project, ProjectType, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
pub use domain::state::{ProjectEvent, ProjectState, ProjectStateMachine, StateError};
