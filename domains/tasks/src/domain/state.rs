//! State machine for workflow tasks
//!
//! ```text
//! Prepared --start--> Started
//! Started --accept/forward--> Started
//! Started --halt--> Halted
//! Started --end--> Ended
//! Halted | Ended --reactivate--> Started
//! ```

use serde::{Deserialize, Serialize};

pub use cms_common::StateError;

/// Task states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Created with a wakeup time in the future
    Prepared,
    #[default]
    Started,
    Halted,
    Ended,
}

impl TaskState {
    /// Tasks can always be reactivated, so no state is terminal
    #[mutants::skip] // Always false
    pub fn is_terminal(&self) -> bool {
        false
    }

    /// Whether work on the task is finished or suspended
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Halted | Self::Ended)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [TaskState] {
        match self {
            Self::Prepared => &[Self::Started],
            Self::Started => &[Self::Started, Self::Halted, Self::Ended],
            Self::Halted => &[Self::Started],
            Self::Ended => &[Self::Started],
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prepared => write!(f, "prepared"),
            Self::Started => write!(f, "started"),
            Self::Halted => write!(f, "halted"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Events that trigger task state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// Wakeup time reached
    Start,
    /// Agent takes the task
    Accept,
    /// Task handed to another agent or role
    Forward,
    /// Work suspended
    Halt,
    /// Work finished
    End,
    /// Reopen a halted or ended task
    Reactivate,
}

impl std::fmt::Display for TaskEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Accept => write!(f, "accept"),
            Self::Forward => write!(f, "forward"),
            Self::Halt => write!(f, "halt"),
            Self::End => write!(f, "end"),
            Self::Reactivate => write!(f, "reactivate"),
        }
    }
}

/// Task state machine
pub struct TaskStateMachine;

impl TaskStateMachine {
    /// Attempt a state transition
    pub fn transition(current: TaskState, event: TaskEvent) -> Result<TaskState, StateError> {
        let next = match (&current, &event) {
            (TaskState::Prepared, TaskEvent::Start) => TaskState::Started,

            (TaskState::Started, TaskEvent::Accept) => TaskState::Started,
            (TaskState::Started, TaskEvent::Forward) => TaskState::Started,
            (TaskState::Started, TaskEvent::Halt) => TaskState::Halted,
            (TaskState::Started, TaskEvent::End) => TaskState::Ended,

            (TaskState::Halted, TaskEvent::Reactivate) => TaskState::Started,
            (TaskState::Ended, TaskEvent::Reactivate) => TaskState::Started,

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
    pub fn can_transition(current: TaskState, event: &TaskEvent) -> bool {
        Self::transition(current, event.clone()).is_ok()
    }
}
