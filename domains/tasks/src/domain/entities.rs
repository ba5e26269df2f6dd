//! Domain entities for the Tasks domain
//!
//! Tasks drive the editorial workflow of a project: an initiator hands work to
//! an agent (or to everyone in a role group), the agent accepts, forwards or
//! ends it. Every step may be recorded in the task log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cms_common::{Error, Result};

use crate::domain::state::{TaskEvent, TaskState, TaskStateMachine};

/// Maximum task name length
pub const MAX_NAME_LEN: usize = 255;

/// Maximum task log comment length
pub const MAX_COMMENT_LEN: usize = 2048;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High = 1,
    #[default]
    Normal = 2,
    Low = 3,
}

impl TaskPriority {
    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn from_value(value: i32) -> Result<Self> {
        match value {
            1 => Ok(TaskPriority::High),
            2 => Ok(TaskPriority::Normal),
            3 => Ok(TaskPriority::Low),
            other => Err(Error::Validation(format!(
                "Task priority must be 1-3, got {}",
                other
            ))),
        }
    }
}

/// Parameters for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub project_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub root_id: Option<Uuid>,
    pub initiator_user_id: Uuid,
    pub agent_user_id: Uuid,
    pub role_group_id: Uuid,
    pub priority: TaskPriority,
    pub wakeup_time: Option<DateTime<Utc>>,
    pub timeout: DateTime<Utc>,
}

/// Task entity
///
/// Two tasks are equal when their ids are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub project_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub root_id: Uuid,
    pub task_type: i32,
    pub state: TaskState,
    pub priority: TaskPriority,
    pub percentage: u8,
    pub initiator_user_id: Uuid,
    pub original_user_id: Uuid,
    pub agent_user_id: Uuid,
    pub role_group_id: Uuid,
    pub milestone_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub wakeup_time: Option<DateTime<Utc>>,
    pub timeout: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub escalation_type: i32,
    pub auto_finish: bool,
    pub permission: i32,
    pub html_link: Option<String>,
}

impl Task {
    /// Create a new task with validation
    ///
    /// A task whose wakeup time lies in the future starts out `Prepared`;
    /// otherwise it is `Started` immediately. A task without a root is its
    /// own root.
    pub fn new(params: NewTask) -> Result<Self> {
        let now = Utc::now();
        Self::validate_name(&params.name)?;
        if params.timeout < now {
            return Err(Error::Validation(
                "Task timeout must not precede its start time".to_string(),
            ));
        }
        if matches!(params.wakeup_time, Some(wakeup) if wakeup > params.timeout) {
            return Err(Error::Validation(
                "Task wakeup time must not follow its timeout".to_string(),
            ));
        }

        let state = match params.wakeup_time {
            Some(wakeup) if wakeup > now => TaskState::Prepared,
            _ => TaskState::Started,
        };

        let id = Uuid::new_v4();
        Ok(Task {
            id,
            name: params.name,
            project_id: params.project_id,
            parent_id: params.parent_id,
            root_id: params.root_id.unwrap_or(id),
            task_type: 0,
            state,
            priority: params.priority,
            percentage: 0,
            initiator_user_id: params.initiator_user_id,
            original_user_id: params.agent_user_id,
            agent_user_id: params.agent_user_id,
            role_group_id: params.role_group_id,
            milestone_id: None,
            start_time: now,
            wakeup_time: params.wakeup_time,
            timeout: params.timeout,
            end_time: None,
            escalation_type: 0,
            auto_finish: false,
            permission: 0,
            html_link: None,
        })
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
            return Err(Error::Validation(format!(
                "Task name must be 1-{} characters",
                MAX_NAME_LEN
            )));
        }
        Ok(())
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        Self::validate_name(&self.name)?;

        if self.percentage > 100 {
            return Err(Error::Validation(
                "Task percentage must be 0-100".to_string(),
            ));
        }

        if self.timeout < self.start_time {
            return Err(Error::Validation(
                "Task timeout must not precede its start time".to_string(),
            ));
        }

        // Only ended tasks carry an end time
        if self.end_time.is_some() != (self.state == TaskState::Ended) {
            return Err(Error::Validation(
                "Task end time must be set exactly when the task has ended".to_string(),
            ));
        }

        Ok(())
    }

    /// Leave the prepared state once the wakeup time is reached
    ///
    /// `start_time` stays the creation time, so a late start leaves the task
    /// valid but overdue.
    pub fn start(&mut self) -> Result<()> {
        self.state = self.apply_transition(TaskEvent::Start)?;
        Ok(())
    }

    /// The given user takes over the task
    pub fn accept(&mut self, user_id: Uuid) -> Result<()> {
        self.state = self.apply_transition(TaskEvent::Accept)?;
        self.agent_user_id = user_id;
        Ok(())
    }

    /// Hand the task to a new agent and role group
    pub fn forward(&mut self, agent_user_id: Uuid, role_group_id: Uuid) -> Result<()> {
        self.state = self.apply_transition(TaskEvent::Forward)?;
        self.agent_user_id = agent_user_id;
        self.role_group_id = role_group_id;
        Ok(())
    }

    pub fn halt(&mut self) -> Result<()> {
        self.state = self.apply_transition(TaskEvent::Halt)?;
        Ok(())
    }

    /// Finish the task
    pub fn end(&mut self) -> Result<()> {
        self.state = self.apply_transition(TaskEvent::End)?;
        self.percentage = 100;
        self.end_time = Some(Utc::now());
        Ok(())
    }

    /// Reopen a halted or ended task
    pub fn reactivate(&mut self) -> Result<()> {
        self.state = self.apply_transition(TaskEvent::Reactivate)?;
        self.percentage = 0;
        self.end_time = None;
        Ok(())
    }

    pub fn set_percentage(&mut self, percentage: u8) -> Result<()> {
        if percentage > 100 {
            return Err(Error::Validation(
                "Task percentage must be 0-100".to_string(),
            ));
        }
        self.percentage = percentage;
        Ok(())
    }

    /// Whether the task is still open past its timeout
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.state != TaskState::Ended && now > self.timeout
    }

    pub fn is_root(&self) -> bool {
        self.root_id == self.id
    }

    fn apply_transition(&self, event: TaskEvent) -> Result<TaskState> {
        TaskStateMachine::transition(self.state, event).map_err(|e| e.into_validation("task"))
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl std::hash::Hash for Task {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Task log entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskLogType {
    /// Written by a user
    #[default]
    Note,
    /// Written by the workflow itself (accept, forward, end ...)
    System,
}

/// Task log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskLog {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub log_type: TaskLogType,
    pub created_at: DateTime<Utc>,
}

impl TaskLog {
    /// Create a new task log entry with validation
    pub fn new(task_id: Uuid, user_id: Uuid, comment: String, log_type: TaskLogType) -> Result<Self> {
        if comment.trim().is_empty() || comment.len() > MAX_COMMENT_LEN {
            return Err(Error::Validation(format!(
                "Task log comment must be 1-{} characters",
                MAX_COMMENT_LEN
            )));
        }

        Ok(TaskLog {
            id: Uuid::new_v4(),
            task_id,
            user_id,
            comment,
            log_type,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn params() -> NewTask {
        NewTask {
            name: "Review start page".to_string(),
            project_id: Uuid::new_v4(),
            parent_id: None,
            root_id: None,
            initiator_user_id: Uuid::new_v4(),
            agent_user_id: Uuid::new_v4(),
            role_group_id: Uuid::new_v4(),
            priority: TaskPriority::Normal,
            wakeup_time: None,
            timeout: Utc::now() + Duration::days(7),
        }
    }

    #[test]
    fn test_task_creation() {
        let p = params();
        let task = Task::new(p.clone()).unwrap();

        assert_eq!(task.name, "Review start page");
        assert_eq!(task.state, TaskState::Started);
        assert_eq!(task.agent_user_id, p.agent_user_id);
        assert_eq!(task.original_user_id, p.agent_user_id);
        assert_eq!(task.percentage, 0);
        assert!(task.is_root());
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_task_with_future_wakeup_is_prepared() {
        let mut p = params();
        p.wakeup_time = Some(Utc::now() + Duration::days(1));

        let mut task = Task::new(p).unwrap();
        assert_eq!(task.state, TaskState::Prepared);
        assert!(task.accept(Uuid::new_v4()).is_err());

        task.start().unwrap();
        assert_eq!(task.state, TaskState::Started);
    }

    #[test]
    fn test_task_rejects_past_timeout_and_blank_name() {
        let mut p = params();
        p.timeout = Utc::now() - Duration::hours(1);
        assert!(Task::new(p).is_err());

        let mut p = params();
        p.name = "  ".to_string();
        assert!(Task::new(p).is_err());
    }

    #[test]
    fn test_task_rejects_wakeup_after_timeout() {
        let mut p = params();
        p.wakeup_time = Some(p.timeout + Duration::hours(1));
        assert!(matches!(Task::new(p), Err(Error::Validation(_))));
    }

    #[test]
    fn test_task_started_after_timeout_stays_valid() {
        let mut p = params();
        p.wakeup_time = Some(Utc::now() + Duration::milliseconds(50));
        p.timeout = Utc::now() + Duration::milliseconds(80);

        let mut task = Task::new(p).unwrap();
        assert_eq!(task.state, TaskState::Prepared);
        let created = task.start_time;

        std::thread::sleep(std::time::Duration::from_millis(150));
        task.start().unwrap();

        assert_eq!(task.state, TaskState::Started);
        assert_eq!(task.start_time, created);
        assert!(task.validate().is_ok());
        assert!(task.is_overdue(Utc::now()));
    }

    #[test]
    fn test_task_child_keeps_root() {
        let root = Task::new(params()).unwrap();
        let mut p = params();
        p.parent_id = Some(root.id);
        p.root_id = Some(root.id);

        let child = Task::new(p).unwrap();
        assert_eq!(child.root_id, root.id);
        assert!(!child.is_root());
    }

    #[test]
    fn test_task_accept_and_forward() {
        let mut task = Task::new(params()).unwrap();
        let agent = Uuid::new_v4();
        let role = Uuid::new_v4();

        task.accept(agent).unwrap();
        assert_eq!(task.agent_user_id, agent);

        let next_agent = Uuid::new_v4();
        task.forward(next_agent, role).unwrap();
        assert_eq!(task.agent_user_id, next_agent);
        assert_eq!(task.role_group_id, role);
        assert_ne!(task.original_user_id, next_agent);
    }

    #[test]
    fn test_task_end_and_reactivate() {
        let mut task = Task::new(params()).unwrap();
        task.set_percentage(40).unwrap();

        task.end().unwrap();
        assert_eq!(task.state, TaskState::Ended);
        assert_eq!(task.percentage, 100);
        assert!(task.end_time.is_some());
        assert!(task.validate().is_ok());
        assert!(task.end().is_err());

        task.reactivate().unwrap();
        assert_eq!(task.state, TaskState::Started);
        assert_eq!(task.percentage, 0);
        assert!(task.end_time.is_none());
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_task_halt_blocks_forward() {
        let mut task = Task::new(params()).unwrap();
        task.halt().unwrap();
        assert!(task.forward(Uuid::new_v4(), Uuid::new_v4()).is_err());
        task.reactivate().unwrap();
        assert!(task.forward(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_task_percentage_bounds() {
        let mut task = Task::new(params()).unwrap();
        assert!(task.set_percentage(100).is_ok());
        assert!(task.set_percentage(101).is_err());
        assert_eq!(task.percentage, 100);
    }

    #[test]
    fn test_task_overdue() {
        let task = Task::new(params()).unwrap();
        assert!(!task.is_overdue(Utc::now()));
        assert!(task.is_overdue(task.timeout + Duration::seconds(1)));

        let mut ended = task.clone();
        ended.end().unwrap();
        assert!(!ended.is_overdue(task.timeout + Duration::seconds(1)));
    }

    #[test]
    fn test_task_equality_by_id() {
        let task = Task::new(params()).unwrap();
        let mut renamed = task.clone();
        renamed.name = "Something else".to_string();
        assert_eq!(task, renamed);
        assert_ne!(task, Task::new(params()).unwrap());
    }

    #[test]
    fn test_task_priority_values() {
        assert_eq!(TaskPriority::High.value(), 1);
        assert_eq!(TaskPriority::from_value(3).unwrap(), TaskPriority::Low);
        assert!(TaskPriority::from_value(0).is_err());
        assert!(TaskPriority::High < TaskPriority::Low);
    }

    #[test]
    fn test_task_log_validation() {
        let log = TaskLog::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Looks good".to_string(),
            TaskLogType::Note,
        )
        .unwrap();
        assert_eq!(log.log_type, TaskLogType::Note);

        assert!(TaskLog::new(Uuid::new_v4(), Uuid::new_v4(), String::new(), TaskLogType::Note).is_err());
        assert!(TaskLog::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "x".repeat(MAX_COMMENT_LEN + 1),
            TaskLogType::System
        )
        .is_err());
    }
}
