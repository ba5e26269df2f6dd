//! User and group broker

use std::collections::HashSet;

use uuid::Uuid;

use cms_common::{Error, Result};
use cms_principals::{Group, GroupFlags, User};

use super::InMemoryBroker;
use crate::contracts::PrincipalBroker;

fn sorted_groups(mut groups: Vec<Group>) -> Vec<Group> {
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    groups
}

#[async_trait::async_trait]
impl PrincipalBroker for InMemoryBroker {
    async fn create_user(&self, name: &str, email: &str, description: &str) -> Result<User> {
        let user = User::new(name.to_string(), email.to_string(), description.to_string())?;

        let mut store = self.store().write().await;
        if store.users.values().any(|u| u.name == name) {
            return Err(Error::Conflict(format!("User '{}' already exists", name)));
        }
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, name = %user.name, "Created user");
        Ok(user)
    }

    async fn read_user(&self, user_id: Uuid) -> Result<User> {
        let store = self.store().read().await;
        store.user(user_id).cloned()
    }

    async fn read_user_by_name(&self, name: &str) -> Result<User> {
        let store = self.store().read().await;
        store
            .users
            .values()
            .find(|u| u.name == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User '{}'", name)))
    }

    async fn create_group(
        &self,
        name: &str,
        description: &str,
        flags: GroupFlags,
        parent_name: Option<&str>,
    ) -> Result<Group> {
        let mut store = self.store().write().await;

        if store.groups.values().any(|g| g.name == name) {
            return Err(Error::Conflict(format!("Group '{}' already exists", name)));
        }
        let parent_id = match parent_name {
            Some(parent) => Some(store.group_by_name(parent)?.id),
            None => None,
        };

        let group = Group::new(name.to_string(), description.to_string(), flags, parent_id)?;
        store.groups.insert(group.id, group.clone());

        tracing::info!(group_id = %group.id, name = %group.name, "Created group");
        Ok(group)
    }

    async fn read_group(&self, group_id: Uuid) -> Result<Group> {
        let store = self.store().read().await;
        store.group(group_id).cloned()
    }

    async fn read_group_by_name(&self, name: &str) -> Result<Group> {
        let store = self.store().read().await;
        store.group_by_name(name).cloned()
    }

    async fn write_group(&self, group: &Group) -> Result<Group> {
        group.validate()?;

        let mut store = self.store().write().await;
        store.group(group.id)?;

        if store
            .groups
            .values()
            .any(|g| g.id != group.id && g.name == group.name)
        {
            return Err(Error::Conflict(format!(
                "Group '{}' already exists",
                group.name
            )));
        }

        if let Some(parent_id) = group.parent_id {
            store.group(parent_id)?;
            if store.ancestors(parent_id).contains(&group.id) {
                return Err(Error::Validation(format!(
                    "Group '{}' cannot become its own ancestor",
                    group.name
                )));
            }
        }

        store.groups.insert(group.id, group.clone());
        tracing::info!(group_id = %group.id, flags = group.flags.bits(), "Wrote group");
        Ok(group.clone())
    }

    async fn get_child(&self, group_name: &str) -> Result<Vec<Group>> {
        let store = self.store().read().await;
        let parent_id = store.group_by_name(group_name)?.id;

        let children = store
            .groups
            .values()
            .filter(|g| g.parent_id == Some(parent_id))
            .cloned()
            .collect();
        Ok(sorted_groups(children))
    }

    async fn get_childs_recursive(&self, group_name: &str) -> Result<Vec<Group>> {
        let store = self.store().read().await;
        let root_id = store.group_by_name(group_name)?.id;

        let descendants = store
            .groups
            .values()
            .filter(|g| g.id != root_id && store.ancestors(g.id).contains(&root_id))
            .cloned()
            .collect();
        Ok(sorted_groups(descendants))
    }

    async fn get_parent(&self, group_name: &str) -> Result<Option<Group>> {
        let store = self.store().read().await;
        let group = store.group_by_name(group_name)?;

        Ok(group
            .parent_id
            .and_then(|parent_id| store.groups.get(&parent_id))
            .cloned())
    }

    async fn add_user_to_group(&self, user_id: Uuid, group_name: &str) -> Result<()> {
        let mut store = self.store().write().await;
        store.user(user_id)?;
        let group_id = store.group_by_name(group_name)?.id;

        if !store.memberships.entry(group_id).or_default().insert(user_id) {
            return Err(Error::Conflict(format!(
                "User {} is already a member of '{}'",
                user_id, group_name
            )));
        }

        tracing::info!(user_id = %user_id, group = %group_name, "Added user to group");
        Ok(())
    }

    async fn remove_user_from_group(&self, user_id: Uuid, group_name: &str) -> Result<()> {
        let mut store = self.store().write().await;
        let group_id = store.group_by_name(group_name)?.id;

        let removed = store
            .memberships
            .get_mut(&group_id)
            .map(|members| members.remove(&user_id))
            .unwrap_or(false);
        if !removed {
            return Err(Error::NotFound(format!(
                "User {} is not a member of '{}'",
                user_id, group_name
            )));
        }

        tracing::info!(user_id = %user_id, group = %group_name, "Removed user from group");
        Ok(())
    }

    async fn get_users_of_group(&self, group_name: &str) -> Result<Vec<User>> {
        let store = self.store().read().await;
        let group_id = store.group_by_name(group_name)?.id;

        let mut users: Vec<User> = store
            .memberships
            .get(&group_id)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| store.users.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn get_groups_of_user(&self, user_id: Uuid) -> Result<Vec<Group>> {
        let store = self.store().read().await;
        store.user(user_id)?;

        let ids: HashSet<Uuid> = store.groups_of_user(user_id);
        let groups = ids
            .iter()
            .filter_map(|id| store.groups.get(id))
            .cloned()
            .collect();
        Ok(sorted_groups(groups))
    }

    async fn user_in_group(&self, user_id: Uuid, group_id: Uuid) -> Result<bool> {
        let store = self.store().read().await;
        store.user(user_id)?;
        store.group(group_id)?;
        Ok(store.user_in_group(user_id, group_id))
    }
}
