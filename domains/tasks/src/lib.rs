//! Tasks domain: workflow tasks, task logs and the task lifecycle

pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{NewTask, Task, TaskLog, TaskLogType, TaskPriority};
pub use domain::state::{StateError, TaskEvent, TaskState, TaskStateMachine};
