//! Resource type handlers
//!
//! One handler per resource type. Handlers carry the static type record and
//! forward every operation to the [`CmsObject`] facade; creating a resource is
//! always "create the file, then lock it for the creator".

use std::collections::HashMap;
use std::sync::Arc;

use cms_common::{Error, Result};

use crate::domain::entities::{CmsFile, Properties, ResourceType, LAUNCHER_DUMB, LAUNCHER_JSP};
use crate::domain::validation::validate_resource_name;
use crate::facade::CmsObject;

fn check_file_name(name: &str) -> Result<()> {
    if !validate_resource_name(name) || name.ends_with('/') {
        return Err(Error::Validation(format!(
            "Invalid file resource name '{}'",
            name
        )));
    }
    Ok(())
}

/// Resource type handler trait
#[async_trait::async_trait]
pub trait ResourceTypeHandler: Send + Sync {
    /// The static record of the handled type
    fn resource_type(&self) -> &ResourceType;

    /// Create a file of this type and lock it for the current user
    async fn create_resource(
        &self,
        cms: &dyn CmsObject,
        name: &str,
        properties: &Properties,
        contents: &[u8],
    ) -> Result<CmsFile> {
        check_file_name(name)?;

        let mut file = cms
            .do_create_file(name, contents, self.resource_type(), properties)
            .await?;
        cms.lock_resource(&file.name, false).await?;
        file.locked_by = Some(cms.request_context().user_id);

        tracing::debug!(
            resource = %file.name,
            resource_type = %self.resource_type(),
            "Created resource"
        );
        Ok(file)
    }

    /// Copy a file of this type and lock the copy for the current user
    async fn copy_resource(
        &self,
        cms: &dyn CmsObject,
        source: &str,
        destination: &str,
    ) -> Result<CmsFile> {
        check_file_name(destination)?;

        let mut file = cms.do_copy_file(source, destination).await?;
        cms.lock_resource(&file.name, false).await?;
        file.locked_by = Some(cms.request_context().user_id);
        Ok(file)
    }

    /// Change a resource's type to `new_type`
    async fn change_resource_type(
        &self,
        cms: &dyn CmsObject,
        name: &str,
        new_type: &ResourceType,
    ) -> Result<CmsFile> {
        cms.do_chtype(name, new_type).await
    }

    /// Write a property on a resource of this type
    async fn write_property(
        &self,
        cms: &dyn CmsObject,
        name: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        cms.write_property(name, key, value).await
    }
}

macro_rules! builtin_handler {
    ($(#[$meta:meta])* $handler:ident, $id:expr, $name:expr, $launcher:expr, $class:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $handler {
            resource_type: ResourceType,
        }

        impl $handler {
            pub const TYPE_ID: i32 = $id;
            pub const TYPE_NAME: &'static str = $name;

            pub fn new() -> Self {
                Self {
                    resource_type: ResourceType {
                        id: Self::TYPE_ID,
                        name: Self::TYPE_NAME.to_string(),
                        launcher_type: $launcher,
                        launcher_class: $class.to_string(),
                    },
                }
            }
        }

        impl Default for $handler {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ResourceTypeHandler for $handler {
            fn resource_type(&self) -> &ResourceType {
                &self.resource_type
            }
        }
    };
}

builtin_handler!(
    /// Plain text resources kept for older content
    CompatiblePlainHandler,
    1,
    "compatibleplain",
    LAUNCHER_DUMB,
    "DumbLauncher"
);

builtin_handler!(
    /// Images delivered as-is
    ImageHandler,
    2,
    "image",
    LAUNCHER_DUMB,
    "DumbLauncher"
);

builtin_handler!(
    /// Arbitrary binary downloads
    BinaryHandler,
    5,
    "binary",
    LAUNCHER_DUMB,
    "DumbLauncher"
);

builtin_handler!(
    /// Server-side JSP templates
    JspHandler,
    6,
    "jsp",
    LAUNCHER_JSP,
    "JspLauncher"
);

/// Lookup of resource type handlers by id and by name
#[derive(Clone, Default)]
pub struct ResourceTypeRegistry {
    by_id: HashMap<i32, Arc<dyn ResourceTypeHandler>>,
    by_name: HashMap<String, i32>,
}

impl ResourceTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in handlers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let builtins: [Arc<dyn ResourceTypeHandler>; 4] = [
            Arc::new(CompatiblePlainHandler::new()),
            Arc::new(ImageHandler::new()),
            Arc::new(BinaryHandler::new()),
            Arc::new(JspHandler::new()),
        ];
        for handler in builtins {
            let registered = registry.register(handler);
            debug_assert!(
                registered.is_ok(),
                "built-in resource types have distinct ids and names"
            );
            if let Err(e) = registered {
                tracing::error!(error = %e, "Failed to register built-in resource type");
            }
        }
        registry
    }

    /// Register a handler; ids and names must be unique
    pub fn register(&mut self, handler: Arc<dyn ResourceTypeHandler>) -> Result<()> {
        let rt = handler.resource_type().clone();

        if self.by_id.contains_key(&rt.id) {
            return Err(Error::Conflict(format!(
                "Resource type id {} already registered",
                rt.id
            )));
        }
        if self.by_name.contains_key(&rt.name) {
            return Err(Error::Conflict(format!(
                "Resource type '{}' already registered",
                rt.name
            )));
        }

        tracing::info!(resource_type = %rt, launcher = %rt.launcher_class, "Registered resource type");
        self.by_name.insert(rt.name, rt.id);
        self.by_id.insert(rt.id, handler);
        Ok(())
    }

    pub fn get_by_id(&self, id: i32) -> Result<Arc<dyn ResourceTypeHandler>> {
        self.by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Resource type id {}", id)))
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<dyn ResourceTypeHandler>> {
        self.by_name
            .get(name)
            .and_then(|id| self.by_id.get(id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Resource type '{}'", name)))
    }

    /// All registered type records, ordered by id
    pub fn resource_types(&self) -> Vec<ResourceType> {
        let mut types: Vec<_> = self
            .by_id
            .values()
            .map(|h| h.resource_type().clone())
            .collect();
        types.sort_by_key(|rt| rt.id);
        types
    }

    /// Create a resource through the handler registered for `type_name`
    pub async fn create_resource(
        &self,
        cms: &dyn CmsObject,
        type_name: &str,
        name: &str,
        properties: &Properties,
        contents: &[u8],
    ) -> Result<CmsFile> {
        self.get_by_name(type_name)?
            .create_resource(cms, name, properties, contents)
            .await
    }

    /// Change the type of an existing resource to `type_name`
    pub async fn change_type(
        &self,
        cms: &dyn CmsObject,
        name: &str,
        type_name: &str,
    ) -> Result<CmsFile> {
        let current = cms.read_file(name).await?;
        let handler = self.get_by_id(current.type_id)?;
        let target = self.get_by_name(type_name)?;
        handler
            .change_resource_type(cms, name, target.resource_type())
            .await
    }
}
