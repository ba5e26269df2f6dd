//! Broker capability traits

use uuid::Uuid;

use cms_common::Result;
use cms_principals::{Group, GroupFlags, User};
use cms_projects::{Project, ProjectType};
use cms_reference::{Category, Country, Language, SiteUrls};
use cms_resources::PropertyDefinition;
use cms_tasks::{NewTask, Task, TaskLog, TaskLogType, TaskState};

/// Project persistence
#[async_trait::async_trait]
pub trait ProjectBroker: Send + Sync {
    /// Create a project. The groups are looked up by name; project names are unique.
    async fn create_project(
        &self,
        name: &str,
        description: &str,
        owner_id: Uuid,
        group_name: &str,
        manager_group_name: &str,
        project_type: ProjectType,
    ) -> Result<Project>;

    async fn read_project(&self, project_id: Uuid) -> Result<Project>;

    async fn read_project_by_name(&self, name: &str) -> Result<Project>;

    /// Store changes to an existing project; archived projects are read-only
    async fn write_project(&self, project: &Project) -> Result<Project>;

    /// Non-archived projects the user owns or can reach through the project
    /// group or manager group, sorted by name
    async fn get_all_accessible_projects_by_user(&self, user_id: Uuid) -> Result<Vec<Project>>;

    /// Non-archived projects whose group or manager group is `group_id`,
    /// sorted by name
    async fn get_all_accessible_projects_by_group(&self, group_id: Uuid) -> Result<Vec<Project>>;

    /// Non-archived projects the user owns or manages, sorted by name
    async fn get_all_manageable_projects(&self, user_id: Uuid) -> Result<Vec<Project>>;
}

/// User and group persistence
#[async_trait::async_trait]
pub trait PrincipalBroker: Send + Sync {
    async fn create_user(&self, name: &str, email: &str, description: &str) -> Result<User>;

    async fn read_user(&self, user_id: Uuid) -> Result<User>;

    async fn read_user_by_name(&self, name: &str) -> Result<User>;

    async fn create_group(
        &self,
        name: &str,
        description: &str,
        flags: GroupFlags,
        parent_name: Option<&str>,
    ) -> Result<Group>;

    async fn read_group(&self, group_id: Uuid) -> Result<Group>;

    async fn read_group_by_name(&self, name: &str) -> Result<Group>;

    /// Store changes to an existing group; the parent chain must stay acyclic
    async fn write_group(&self, group: &Group) -> Result<Group>;

    /// Direct child groups, sorted by name
    async fn get_child(&self, group_name: &str) -> Result<Vec<Group>>;

    /// All descendant groups, sorted by name
    async fn get_childs_recursive(&self, group_name: &str) -> Result<Vec<Group>>;

    async fn get_parent(&self, group_name: &str) -> Result<Option<Group>>;

    async fn add_user_to_group(&self, user_id: Uuid, group_name: &str) -> Result<()>;

    async fn remove_user_from_group(&self, user_id: Uuid, group_name: &str) -> Result<()>;

    /// Direct members of a group, sorted by name
    async fn get_users_of_group(&self, group_name: &str) -> Result<Vec<User>>;

    /// Enabled groups the user belongs to directly, plus their ancestors
    async fn get_groups_of_user(&self, user_id: Uuid) -> Result<Vec<Group>>;

    async fn user_in_group(&self, user_id: Uuid, group_id: Uuid) -> Result<bool>;
}

/// Workflow task persistence
#[async_trait::async_trait]
pub trait TaskBroker: Send + Sync {
    /// Create a task; project, users, role group and parent task must exist
    async fn create_task(&self, params: NewTask) -> Result<Task>;

    async fn read_task(&self, task_id: Uuid) -> Result<Task>;

    async fn write_task(&self, task: &Task) -> Result<Task>;

    /// Tasks whose agent is the user, optionally filtered by state, ordered
    /// by priority then timeout
    async fn read_tasks_for_user(
        &self,
        user_id: Uuid,
        state: Option<TaskState>,
    ) -> Result<Vec<Task>>;

    /// Tasks of a project, ordered by start time
    async fn read_tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>>;

    async fn write_task_log(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        comment: &str,
        log_type: TaskLogType,
    ) -> Result<TaskLog>;

    /// Log entries of a task in the order they were written
    async fn read_task_logs(&self, task_id: Uuid) -> Result<Vec<TaskLog>>;
}

/// Property definition persistence
#[async_trait::async_trait]
pub trait PropertyBroker: Send + Sync {
    async fn create_property_definition(
        &self,
        name: &str,
        resource_type_id: i32,
    ) -> Result<PropertyDefinition>;

    async fn read_property_definition(
        &self,
        name: &str,
        resource_type_id: i32,
    ) -> Result<PropertyDefinition>;

    /// Definitions of one resource type, sorted by name
    async fn read_all_property_definitions(
        &self,
        resource_type_id: i32,
    ) -> Result<Vec<PropertyDefinition>>;

    async fn delete_property_definition(&self, name: &str, resource_type_id: i32) -> Result<()>;
}

/// Reference data persistence
#[async_trait::async_trait]
pub trait ReferenceDataBroker: Send + Sync {
    /// Insert or replace by id
    async fn write_category(&self, category: Category) -> Result<()>;

    async fn write_country(&self, country: Country) -> Result<()>;

    async fn write_language(&self, language: Language) -> Result<()>;

    /// Insert or replace by id; an alias must point at a primary URL of the same site
    async fn write_site_url(&self, site_url: SiteUrls) -> Result<()>;

    async fn read_categories(&self) -> Result<Vec<Category>>;

    async fn read_countries(&self) -> Result<Vec<Country>>;

    async fn read_languages(&self) -> Result<Vec<Language>>;

    async fn read_language_by_short_name(&self, short_name: &str) -> Result<Language>;

    /// URLs of a site, primary URL first
    async fn read_site_urls(&self, site_id: i32) -> Result<Vec<SiteUrls>>;
}

/// A complete resource broker
pub trait ResourceBroker:
    ProjectBroker + PrincipalBroker + TaskBroker + PropertyBroker + ReferenceDataBroker
{
}

impl<T> ResourceBroker for T where
    T: ProjectBroker + PrincipalBroker + TaskBroker + PropertyBroker + ReferenceDataBroker
{
}
