//! Project broker

use uuid::Uuid;

use cms_common::{Error, Result};
use cms_projects::{Project, ProjectType};

use super::{InMemoryBroker, Store};
use crate::contracts::ProjectBroker;

fn sorted_by_name(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    projects
}

fn project<'a>(store: &'a Store, project_id: Uuid) -> Result<&'a Project> {
    store
        .projects
        .get(&project_id)
        .ok_or_else(|| Error::NotFound(format!("Project {}", project_id)))
}

#[async_trait::async_trait]
impl ProjectBroker for InMemoryBroker {
    async fn create_project(
        &self,
        name: &str,
        description: &str,
        owner_id: Uuid,
        group_name: &str,
        manager_group_name: &str,
        project_type: ProjectType,
    ) -> Result<Project> {
        let mut store = self.store().write().await;

        store.user(owner_id)?;
        let group_id = store.group_by_name(group_name)?.id;
        let manager_group_id = store.group_by_name(manager_group_name)?.id;

        if store.projects.values().any(|p| p.name == name) {
            return Err(Error::Conflict(format!("Project '{}' already exists", name)));
        }

        let project = Project::new(
            name.to_string(),
            description.to_string(),
            owner_id,
            group_id,
            manager_group_id,
            project_type,
        )?;
        store.projects.insert(project.id, project.clone());

        tracing::info!(project_id = %project.id, name = %project.name, "Created project");
        Ok(project)
    }

    async fn read_project(&self, project_id: Uuid) -> Result<Project> {
        let store = self.store().read().await;
        project(&store, project_id).cloned()
    }

    async fn read_project_by_name(&self, name: &str) -> Result<Project> {
        let store = self.store().read().await;
        store
            .projects
            .values()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Project '{}'", name)))
    }

    async fn write_project(&self, project: &Project) -> Result<Project> {
        project.validate()?;

        let mut store = self.store().write().await;
        let stored = self::project(&store, project.id)?;
        if stored.is_archived() {
            tracing::warn!(project_id = %project.id, "Refused write to archived project");
            return Err(Error::AccessDenied(format!(
                "Project '{}' is archived and read-only",
                stored.name
            )));
        }
        if stored.state != project.state
            && !stored.state.valid_transitions().contains(&project.state)
        {
            tracing::warn!(
                project_id = %project.id,
                from = %stored.state,
                to = %project.state,
                "Refused project state change"
            );
            return Err(Error::Validation(format!(
                "Project cannot move from {} to {}",
                stored.state, project.state
            )));
        }

        if store
            .projects
            .values()
            .any(|p| p.id != project.id && p.name == project.name)
        {
            return Err(Error::Conflict(format!(
                "Project '{}' already exists",
                project.name
            )));
        }

        store.user(project.owner_id)?;
        store.group(project.group_id)?;
        store.group(project.manager_group_id)?;

        store.projects.insert(project.id, project.clone());
        tracing::info!(project_id = %project.id, state = %project.state, "Wrote project");
        Ok(project.clone())
    }

    async fn get_all_accessible_projects_by_user(&self, user_id: Uuid) -> Result<Vec<Project>> {
        let store = self.store().read().await;
        store.user(user_id)?;

        let groups = store.groups_of_user(user_id);
        let projects = store
            .projects
            .values()
            .filter(|p| !p.is_archived())
            .filter(|p| {
                p.owner_id == user_id
                    || groups.contains(&p.group_id)
                    || groups.contains(&p.manager_group_id)
            })
            .cloned()
            .collect();

        Ok(sorted_by_name(projects))
    }

    async fn get_all_accessible_projects_by_group(&self, group_id: Uuid) -> Result<Vec<Project>> {
        let store = self.store().read().await;
        store.group(group_id)?;

        let projects = store
            .projects
            .values()
            .filter(|p| p.is_accessible_by_group(group_id))
            .cloned()
            .collect();

        Ok(sorted_by_name(projects))
    }

    async fn get_all_manageable_projects(&self, user_id: Uuid) -> Result<Vec<Project>> {
        let store = self.store().read().await;
        store.user(user_id)?;

        let groups = store.groups_of_user(user_id);
        let projects = store
            .projects
            .values()
            .filter(|p| !p.is_archived())
            .filter(|p| p.owner_id == user_id || groups.contains(&p.manager_group_id))
            .cloned()
            .collect();

        Ok(sorted_by_name(projects))
    }
}
