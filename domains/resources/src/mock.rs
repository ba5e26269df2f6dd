//! In-memory CMS facade
//!
//! Keeps resources in process memory and records every facade call so tests
//! can assert on the exact delegation sequence. Several facades created with
//! [`InMemoryCmsObject::for_context`] share one store, which models several
//! users working on the same repository.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use cms_common::{Error, Result};

use crate::domain::entities::{CmsFile, Properties, ResourceType};
use crate::domain::validation::validate_resource_name;
use crate::facade::{CmsObject, RequestContext};

/// A facade call captured by the in-memory facade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacadeCall {
    CreateFile { name: String, type_id: i32 },
    CopyFile { source: String, destination: String },
    Chtype { name: String, type_id: i32 },
    Lock { name: String, force: bool },
    Unlock { name: String },
    WriteProperty { name: String, key: String },
}

/// In-memory CMS facade
#[derive(Debug, Clone)]
pub struct InMemoryCmsObject {
    context: RequestContext,
    files: Arc<Mutex<HashMap<String, CmsFile>>>,
    calls: Arc<Mutex<Vec<FacadeCall>>>,
}

impl InMemoryCmsObject {
    /// Create a facade with an empty store
    pub fn new(context: RequestContext) -> Self {
        Self {
            context,
            files: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A facade acting for another user or project on the same store
    pub fn for_context(&self, context: RequestContext) -> Self {
        Self {
            context,
            files: Arc::clone(&self.files),
            calls: Arc::clone(&self.calls),
        }
    }

    /// All captured calls, oldest first
    pub async fn calls(&self) -> Vec<FacadeCall> {
        self.calls.lock().await.clone()
    }

    /// Number of stored resources
    pub async fn resource_count(&self) -> usize {
        self.files.lock().await.len()
    }

    /// Clear captured calls
    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    async fn record(&self, call: FacadeCall) {
        self.calls.lock().await.push(call);
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.context.online_project {
            return Err(Error::AccessDenied(
                "The online project cannot be modified".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_valid_name(name: &str) -> Result<()> {
        if !validate_resource_name(name) {
            return Err(Error::Validation(format!(
                "Invalid resource name '{}'",
                name
            )));
        }
        Ok(())
    }

    /// Writes need the lock held by the current user
    fn ensure_locked_by_me(&self, file: &CmsFile) -> Result<()> {
        match file.locked_by {
            Some(owner) if owner == self.context.user_id => Ok(()),
            Some(_) => Err(Error::Locked(format!(
                "{} is locked by another user",
                file.name
            ))),
            None => Err(Error::Locked(format!(
                "{} must be locked before it can be changed",
                file.name
            ))),
        }
    }
}

#[async_trait::async_trait]
impl CmsObject for InMemoryCmsObject {
    fn request_context(&self) -> &RequestContext {
        &self.context
    }

    async fn do_create_file(
        &self,
        name: &str,
        contents: &[u8],
        resource_type: &ResourceType,
        properties: &Properties,
    ) -> Result<CmsFile> {
        self.ensure_writable()?;
        Self::ensure_valid_name(name)?;
        self.record(FacadeCall::CreateFile {
            name: name.to_string(),
            type_id: resource_type.id,
        })
        .await;

        let mut files = self.files.lock().await;
        if files.contains_key(name) {
            return Err(Error::Conflict(format!("Resource {} already exists", name)));
        }

        let now = Utc::now();
        let file = CmsFile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            type_id: resource_type.id,
            project_id: self.context.project_id,
            contents: contents.to_vec(),
            properties: properties.clone(),
            locked_by: None,
            created_by: self.context.user_id,
            created_at: now,
            modified_at: now,
        };
        files.insert(name.to_string(), file.clone());

        tracing::info!(resource = %name, type_id = resource_type.id, "Created file");
        Ok(file)
    }

    async fn do_copy_file(&self, source: &str, destination: &str) -> Result<CmsFile> {
        self.ensure_writable()?;
        Self::ensure_valid_name(destination)?;
        self.record(FacadeCall::CopyFile {
            source: source.to_string(),
            destination: destination.to_string(),
        })
        .await;

        let mut files = self.files.lock().await;
        let original = files
            .get(source)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Resource {}", source)))?;
        if files.contains_key(destination) {
            return Err(Error::Conflict(format!(
                "Resource {} already exists",
                destination
            )));
        }

        let now = Utc::now();
        let copy = CmsFile {
            id: Uuid::new_v4(),
            name: destination.to_string(),
            project_id: self.context.project_id,
            locked_by: None,
            created_by: self.context.user_id,
            created_at: now,
            modified_at: now,
            ..original
        };
        files.insert(destination.to_string(), copy.clone());

        tracing::info!(source = %source, destination = %destination, "Copied file");
        Ok(copy)
    }

    async fn do_chtype(&self, name: &str, resource_type: &ResourceType) -> Result<CmsFile> {
        self.ensure_writable()?;
        self.record(FacadeCall::Chtype {
            name: name.to_string(),
            type_id: resource_type.id,
        })
        .await;

        let mut files = self.files.lock().await;
        let file = files
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("Resource {}", name)))?;
        self.ensure_locked_by_me(file)?;

        file.type_id = resource_type.id;
        file.modified_at = Utc::now();

        tracing::info!(resource = %name, type_id = resource_type.id, "Changed resource type");
        Ok(file.clone())
    }

    async fn lock_resource(&self, name: &str, force: bool) -> Result<()> {
        self.ensure_writable()?;
        self.record(FacadeCall::Lock {
            name: name.to_string(),
            force,
        })
        .await;

        let mut files = self.files.lock().await;
        let file = files
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("Resource {}", name)))?;

        let holder = file.locked_by;
        match holder {
            Some(owner) if owner != self.context.user_id && !force => {
                tracing::warn!(resource = %name, "Lock refused, held by another user");
                Err(Error::Locked(format!("{} is locked by another user", name)))
            }
            _ => {
                file.locked_by = Some(self.context.user_id);
                Ok(())
            }
        }
    }

    async fn unlock_resource(&self, name: &str) -> Result<()> {
        self.ensure_writable()?;
        self.record(FacadeCall::Unlock {
            name: name.to_string(),
        })
        .await;

        let mut files = self.files.lock().await;
        let file = files
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("Resource {}", name)))?;

        let holder = file.locked_by;
        match holder {
            Some(owner) if owner != self.context.user_id => {
                Err(Error::Locked(format!("{} is locked by another user", name)))
            }
            _ => {
                file.locked_by = None;
                Ok(())
            }
        }
    }

    async fn write_property(&self, name: &str, key: &str, value: &str) -> Result<()> {
        self.ensure_writable()?;
        self.record(FacadeCall::WriteProperty {
            name: name.to_string(),
            key: key.to_string(),
        })
        .await;

        let mut files = self.files.lock().await;
        let file = files
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("Resource {}", name)))?;
        self.ensure_locked_by_me(file)?;

        file.properties.insert(key.to_string(), value.to_string());
        file.modified_at = Utc::now();
        Ok(())
    }

    async fn read_property(&self, name: &str, key: &str) -> Result<Option<String>> {
        let files = self.files.lock().await;
        let file = files
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("Resource {}", name)))?;
        Ok(file.properties.get(key).cloned())
    }

    async fn read_file(&self, name: &str) -> Result<CmsFile> {
        self.files
            .lock()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Resource {}", name)))
    }
}
