//! Common state machine error types
//!
//! Shared across all domain crates that implement state machines.

use thiserror::Error;

use crate::error::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} to {to} via {event}")]
    InvalidTransition {
        from: String,
        to: String,
        event: String,
    },

    #[error("Guard condition failed: {0}")]
    GuardFailed(String),

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl StateError {
    /// Convert into a validation error, prefixed with the entity kind
    pub fn into_validation(self, entity: &str) -> Error {
        match self {
            StateError::InvalidTransition { from, event, .. } => Error::Validation(format!(
                "Invalid {} transition: cannot apply '{}' event from '{}' state",
                entity, event, from
            )),
            StateError::TerminalState(state) => Error::Validation(format!(
                "{} is in terminal state '{}' and cannot transition",
                entity, state
            )),
            StateError::GuardFailed(msg) => Error::Validation(msg),
        }
    }
}
