//! Task broker

use uuid::Uuid;

use cms_common::{Error, Result};
use cms_tasks::{NewTask, Task, TaskLog, TaskLogType, TaskState};

use super::InMemoryBroker;
use crate::contracts::TaskBroker;

#[async_trait::async_trait]
impl TaskBroker for InMemoryBroker {
    async fn create_task(&self, params: NewTask) -> Result<Task> {
        let mut store = self.store().write().await;

        store.user(params.initiator_user_id)?;
        store.user(params.agent_user_id)?;
        store.group(params.role_group_id)?;
        if !store.projects.contains_key(&params.project_id) {
            return Err(Error::NotFound(format!("Project {}", params.project_id)));
        }

        let mut params = params;
        // Without a parent the task is its own root
        params.root_id = None;
        if let Some(parent_id) = params.parent_id {
            let parent = store
                .tasks
                .get(&parent_id)
                .ok_or_else(|| Error::NotFound(format!("Task {}", parent_id)))?;
            if parent.project_id != params.project_id {
                return Err(Error::Validation(
                    "A sub task must belong to its parent's project".to_string(),
                ));
            }
            params.root_id = Some(parent.root_id);
        }

        let task = Task::new(params)?;
        store.tasks.insert(task.id, task.clone());

        // The first root task becomes the project's task
        if task.is_root() {
            if let Some(project) = store.projects.get_mut(&task.project_id) {
                if project.task_id.is_none() {
                    project.task_id = Some(task.id);
                }
            }
        }

        tracing::info!(task_id = %task.id, name = %task.name, state = %task.state, "Created task");
        Ok(task)
    }

    async fn read_task(&self, task_id: Uuid) -> Result<Task> {
        let store = self.store().read().await;
        store
            .tasks
            .get(&task_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Task {}", task_id)))
    }

    async fn write_task(&self, task: &Task) -> Result<Task> {
        task.validate()?;

        let mut store = self.store().write().await;
        let stored = store
            .tasks
            .get(&task.id)
            .ok_or_else(|| Error::NotFound(format!("Task {}", task.id)))?;
        if stored.state != task.state && !stored.state.valid_transitions().contains(&task.state) {
            tracing::warn!(
                task_id = %task.id,
                from = %stored.state,
                to = %task.state,
                "Refused task state change"
            );
            return Err(Error::Validation(format!(
                "Task cannot move from {} to {}",
                stored.state, task.state
            )));
        }
        store.user(task.agent_user_id)?;
        store.group(task.role_group_id)?;

        store.tasks.insert(task.id, task.clone());
        tracing::info!(task_id = %task.id, state = %task.state, "Wrote task");
        Ok(task.clone())
    }

    async fn read_tasks_for_user(
        &self,
        user_id: Uuid,
        state: Option<TaskState>,
    ) -> Result<Vec<Task>> {
        let store = self.store().read().await;
        store.user(user_id)?;

        let mut tasks: Vec<Task> = store
            .tasks
            .values()
            .filter(|t| t.agent_user_id == user_id)
            .filter(|t| state.map_or(true, |s| t.state == s))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.timeout.cmp(&b.timeout))
        });
        Ok(tasks)
    }

    async fn read_tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>> {
        let store = self.store().read().await;

        let mut tasks: Vec<Task> = store
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(tasks)
    }

    async fn write_task_log(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        comment: &str,
        log_type: TaskLogType,
    ) -> Result<TaskLog> {
        let mut store = self.store().write().await;
        if !store.tasks.contains_key(&task_id) {
            return Err(Error::NotFound(format!("Task {}", task_id)));
        }
        store.user(user_id)?;

        let log = TaskLog::new(task_id, user_id, comment.to_string(), log_type)?;
        store.task_logs.push(log.clone());

        tracing::debug!(task_id = %task_id, "Wrote task log");
        Ok(log)
    }

    async fn read_task_logs(&self, task_id: Uuid) -> Result<Vec<TaskLog>> {
        let store = self.store().read().await;
        Ok(store
            .task_logs
            .iter()
            .filter(|l| l.task_id == task_id)
            .cloned()
            .collect())
    }
}
