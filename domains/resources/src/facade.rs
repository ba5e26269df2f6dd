//! The CMS facade
//!
//! `CmsObject` is the boundary to the storage layer: it owns permission
//! checks, locking and persistence of resources. Resource type handlers and
//! other callers only ever talk to this trait.

use uuid::Uuid;

use cms_common::Result;

use crate::domain::entities::{CmsFile, Properties, ResourceType};

/// The user and project a facade acts for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub project_id: Uuid,
    /// The online project is read-only
    pub online_project: bool,
}

impl RequestContext {
    pub fn new(user_id: Uuid, project_id: Uuid) -> Self {
        Self {
            user_id,
            project_id,
            online_project: false,
        }
    }

    pub fn online(user_id: Uuid, project_id: Uuid) -> Self {
        Self {
            user_id,
            project_id,
            online_project: true,
        }
    }
}

/// CMS facade trait
#[async_trait::async_trait]
pub trait CmsObject: Send + Sync {
    /// The user and project this facade acts for
    fn request_context(&self) -> &RequestContext;

    /// Create a new file resource of the given type
    async fn do_create_file(
        &self,
        name: &str,
        contents: &[u8],
        resource_type: &ResourceType,
        properties: &Properties,
    ) -> Result<CmsFile>;

    /// Copy a file resource, contents and properties included
    async fn do_copy_file(&self, source: &str, destination: &str) -> Result<CmsFile>;

    /// Change the type of a resource
    async fn do_chtype(&self, name: &str, resource_type: &ResourceType) -> Result<CmsFile>;

    /// Lock a resource for the current user. `force` steals a lock held by
    /// another user.
    async fn lock_resource(&self, name: &str, force: bool) -> Result<()>;

    /// Release the current user's lock on a resource
    async fn unlock_resource(&self, name: &str) -> Result<()>;

    /// Write a single property value
    async fn write_property(&self, name: &str, key: &str, value: &str) -> Result<()>;

    /// Read a single property value
    async fn read_property(&self, name: &str, key: &str) -> Result<Option<String>>;

    /// Read a file resource
    async fn read_file(&self, name: &str) -> Result<CmsFile>;
}
