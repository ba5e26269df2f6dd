//! Domain entities for the Projects domain
//!
//! A project groups the offline changes a team makes to resources before they
//! are published. Access is granted through the project's user group and
//! manager group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cms_common::{Error, Result};

use crate::domain::state::{ProjectEvent, ProjectState, ProjectStateMachine};

/// Maximum project name length
pub const MAX_NAME_LEN: usize = 255;

/// Maximum project description length
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Project type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Normal,
    /// Deleted automatically once published
    Temporary,
}

/// Project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub group_id: Uuid,
    pub manager_group_id: Uuid,
    pub task_id: Option<Uuid>,
    pub state: ProjectState,
    pub project_type: ProjectType,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub published_by: Option<Uuid>,
}

impl Project {
    /// Create a new project with validation
    pub fn new(
        name: String,
        description: String,
        owner_id: Uuid,
        group_id: Uuid,
        manager_group_id: Uuid,
        project_type: ProjectType,
    ) -> Result<Self> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;

        Ok(Project {
            id: Uuid::new_v4(),
            name,
            description,
            owner_id,
            group_id,
            manager_group_id,
            task_id: None,
            state: ProjectState::default(),
            project_type,
            created_at: Utc::now(),
            published_at: None,
            published_by: None,
        })
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
            return Err(Error::Validation(format!(
                "Project name must be 1-{} characters",
                MAX_NAME_LEN
            )));
        }
        if name.contains('/') {
            return Err(Error::Validation(
                "Project name must not contain '/'".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_description(description: &str) -> Result<()> {
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(Error::Validation(format!(
                "Project description must be ≤{} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        Ok(())
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        Self::validate_name(&self.name)?;
        Self::validate_description(&self.description)?;

        // Publishing date and publisher travel together
        if self.published_at.is_some() != self.published_by.is_some() {
            return Err(Error::Validation(
                "Project publish date and publisher must both be set or both be empty".to_string(),
            ));
        }

        let published = self.published_at.is_some();
        if published != (self.state == ProjectState::Archived) {
            return Err(Error::Validation(
                "Only archived projects carry a publish date".to_string(),
            ));
        }

        Ok(())
    }

    /// Lock the project
    pub fn lock(&mut self) -> Result<()> {
        self.state = self.apply_transition(ProjectEvent::Lock)?;
        Ok(())
    }

    /// Unlock the project
    pub fn unlock(&mut self) -> Result<()> {
        self.state = self.apply_transition(ProjectEvent::Unlock)?;
        Ok(())
    }

    /// Publish the project, recording who published it and when
    pub fn publish(&mut self, published_by: Uuid) -> Result<()> {
        self.state = self.apply_transition(ProjectEvent::Publish)?;
        self.published_at = Some(Utc::now());
        self.published_by = Some(published_by);
        Ok(())
    }

    /// Apply a state transition using the state machine
    fn apply_transition(&self, event: ProjectEvent) -> Result<ProjectState> {
        ProjectStateMachine::transition(self.state, event)
            .map_err(|e| e.into_validation("project"))
    }

    /// Check if a transition is valid without applying it
    pub fn can_transition(&self, event: &ProjectEvent) -> bool {
        ProjectStateMachine::can_transition(self.state, event)
    }

    pub fn is_archived(&self) -> bool {
        self.state == ProjectState::Archived
    }

    /// Whether members of `group_id` can work in this project
    pub fn is_accessible_by_group(&self, group_id: Uuid) -> bool {
        !self.is_archived() && (self.group_id == group_id || self.manager_group_id == group_id)
    }
}
