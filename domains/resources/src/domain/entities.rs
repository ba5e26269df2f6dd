//! Domain entities for the Resources domain

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cms_common::{Error, Result};

use crate::domain::validation::validate_property_name;

/// Property values attached to a resource, keyed by property name
pub type Properties = BTreeMap<String, String>;

/// Launcher id of the launcher that streams content unchanged
pub const LAUNCHER_DUMB: i32 = 1;

/// Launcher id of the JSP launcher
pub const LAUNCHER_JSP: i32 = 6;

/// Static resource type record
///
/// Ties a type id and name to the launcher that renders resources of that
/// type at request time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: i32,
    pub name: String,
    pub launcher_type: i32,
    pub launcher_class: String,
}

impl ResourceType {
    pub fn new(id: i32, name: &str, launcher_type: i32, launcher_class: &str) -> Result<Self> {
        if id < 0 {
            return Err(Error::Validation(
                "Resource type id must not be negative".to_string(),
            ));
        }
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::Validation(format!(
                "Invalid resource type name '{}'",
                name
            )));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            launcher_type,
            launcher_class: launcher_class.to_string(),
        })
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Property definition: a property name allowed on resources of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub id: Uuid,
    pub name: String,
    pub resource_type_id: i32,
}

impl PropertyDefinition {
    pub fn new(name: String, resource_type_id: i32) -> Result<Self> {
        if !validate_property_name(&name) {
            return Err(Error::Validation(format!(
                "Invalid property name '{}'",
                name
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            resource_type_id,
        })
    }
}

/// A file resource as returned by the CMS facade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsFile {
    pub id: Uuid,
    pub name: String,
    pub type_id: i32,
    pub project_id: Uuid,
    pub contents: Vec<u8>,
    pub properties: Properties,
    pub locked_by: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl CmsFile {
    pub fn is_folder(&self) -> bool {
        self.name.ends_with('/')
    }

    pub fn is_locked(&self) -> bool {
        self.locked_by.is_some()
    }

    pub fn is_locked_by(&self, user_id: Uuid) -> bool {
        self.locked_by == Some(user_id)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
