//! In-memory broker
//!
//! Implements every broker trait over one shared store. Clones share the
//! store, so a broker can be handed to several tasks at once.

mod principals;
mod projects;
mod properties;
mod reference;
mod tasks;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use cms_common::{CmsConfig, Error, Result};
use cms_principals::{Group, GroupFlags, User};
use cms_projects::{Project, ProjectType};
use cms_reference::{Category, Country, Language, SiteUrls};
use cms_resources::PropertyDefinition;
use cms_tasks::{Task, TaskLog};

use crate::contracts::{PrincipalBroker, ProjectBroker};

/// Everything the in-memory broker holds
#[derive(Debug, Default)]
pub(crate) struct Store {
    pub users: HashMap<Uuid, User>,
    pub groups: HashMap<Uuid, Group>,
    /// group id -> member user ids
    pub memberships: HashMap<Uuid, HashSet<Uuid>>,
    pub projects: HashMap<Uuid, Project>,
    pub tasks: HashMap<Uuid, Task>,
    pub task_logs: Vec<TaskLog>,
    pub property_definitions: Vec<PropertyDefinition>,
    pub categories: BTreeMap<i32, Category>,
    pub countries: BTreeMap<i32, Country>,
    pub languages: BTreeMap<i32, Language>,
    pub site_urls: BTreeMap<i32, SiteUrls>,
}

impl Store {
    pub fn user(&self, user_id: Uuid) -> Result<&User> {
        self.users
            .get(&user_id)
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

    pub fn group(&self, group_id: Uuid) -> Result<&Group> {
        self.groups
            .get(&group_id)
            .ok_or_else(|| Error::NotFound(format!("Group {}", group_id)))
    }

    pub fn group_by_name(&self, name: &str) -> Result<&Group> {
        self.groups
            .values()
            .find(|g| g.name == name)
            .ok_or_else(|| Error::NotFound(format!("Group '{}'", name)))
    }

    /// Ids of the group's ancestors, nearest first
    pub fn ancestors(&self, group_id: Uuid) -> Vec<Uuid> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([group_id]);
        let mut current = self.groups.get(&group_id).and_then(|g| g.parent_id);

        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            chain.push(parent_id);
            current = self.groups.get(&parent_id).and_then(|g| g.parent_id);
        }

        chain
    }

    /// Enabled groups the user is a direct member of, plus all their ancestors
    ///
    /// A disabled group grants nothing, not even membership in its parents.
    pub fn groups_of_user(&self, user_id: Uuid) -> HashSet<Uuid> {
        let mut result = HashSet::new();

        for (group_id, members) in &self.memberships {
            if !members.contains(&user_id) {
                continue;
            }
            match self.groups.get(group_id) {
                Some(group) if !group.is_disabled() => {}
                _ => continue,
            }
            result.insert(*group_id);
            for ancestor in self.ancestors(*group_id) {
                result.insert(ancestor);
            }
        }

        result
    }

    pub fn user_in_group(&self, user_id: Uuid, group_id: Uuid) -> bool {
        self.groups_of_user(user_id).contains(&group_id)
    }
}

/// In-memory resource broker
#[derive(Debug, Clone, Default)]
pub struct InMemoryBroker {
    store: Arc<RwLock<Store>>,
}

impl InMemoryBroker {
    /// Create an empty broker
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a broker holding the well-known groups, an `Admin` user and the
    /// online project
    ///
    /// Groups: the users group (root), the administrators group and the
    /// project manager group (both children of the users group, flagged as
    /// project managers). The admin user is a member of the administrators
    /// group and owns the online project.
    pub async fn bootstrap(config: &CmsConfig) -> Result<Self> {
        let broker = Self::new();

        broker
            .create_group(
                &config.users_group,
                "All users",
                GroupFlags::ENABLED,
                None,
            )
            .await?;
        broker
            .create_group(
                &config.admin_group,
                "Administrators",
                GroupFlags::PROJECT_MANAGER,
                Some(&config.users_group),
            )
            .await?;
        broker
            .create_group(
                &config.project_manager_group,
                "Project managers",
                GroupFlags::PROJECT_MANAGER,
                Some(&config.users_group),
            )
            .await?;

        let admin = broker
            .create_user("Admin", "admin@example.org", "Administrator")
            .await?;
        broker
            .add_user_to_group(admin.id, &config.admin_group)
            .await?;

        broker
            .create_project(
                &config.online_project,
                "The online project",
                admin.id,
                &config.users_group,
                &config.admin_group,
                ProjectType::Normal,
            )
            .await?;

        tracing::info!(
            online_project = %config.online_project,
            "Bootstrapped in-memory broker"
        );

        Ok(broker)
    }

    pub(crate) fn store(&self) -> &RwLock<Store> {
        &self.store
    }
}
