//! State machine for projects
//!
//! A project is edited while `Unlocked`, frozen while `Locked` (e.g. during a
//! publish preparation) and becomes read-only history once published:
//!
//! ```text
//! Unlocked --lock--> Locked --unlock--> Unlocked
//! Unlocked --publish--> Archived (terminal)
//! ```

use serde::{Deserialize, Serialize};

pub use cms_common::StateError;

// ============================================================================
// Project State Machine
// ============================================================================

/// Project states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectState {
    #[default]
    Unlocked,
    Locked,
    Archived,
}

impl ProjectState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ProjectState] {
        match self {
            Self::Unlocked => &[Self::Locked, Self::Archived],
            Self::Locked => &[Self::Unlocked],
            Self::Archived => &[],
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlocked => write!(f, "unlocked"),
            Self::Locked => write!(f, "locked"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// Events that trigger project state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEvent {
    /// Freeze the project's resources
    Lock,
    /// Release a previous lock
    Unlock,
    /// Publish the project's resources to the online project
    Publish,
}

impl std::fmt::Display for ProjectEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lock => write!(f, "lock"),
            Self::Unlock => write!(f, "unlock"),
            Self::Publish => write!(f, "publish"),
        }
    }
}

/// Project state machine
pub struct ProjectStateMachine;

impl ProjectStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: ProjectState,
        event: ProjectEvent,
    ) -> Result<ProjectState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (ProjectState::Unlocked, ProjectEvent::Lock) => ProjectState::Locked,
            (ProjectState::Unlocked, ProjectEvent::Publish) => ProjectState::Archived,
            (ProjectState::Locked, ProjectEvent::Unlock) => ProjectState::Unlocked,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: "unknown".to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: ProjectState, event: &ProjectEvent) -> bool {
        Self::transition(current, event.clone()).is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
