//! Property definition broker

use cms_common::{Error, Result};
use cms_resources::PropertyDefinition;

use super::InMemoryBroker;
use crate::contracts::PropertyBroker;

#[async_trait::async_trait]
impl PropertyBroker for InMemoryBroker {
    async fn create_property_definition(
        &self,
        name: &str,
        resource_type_id: i32,
    ) -> Result<PropertyDefinition> {
        let definition = PropertyDefinition::new(name.to_string(), resource_type_id)?;

        let mut store = self.store().write().await;
        if store
            .property_definitions
            .iter()
            .any(|d| d.name == name && d.resource_type_id == resource_type_id)
        {
            return Err(Error::Conflict(format!(
                "Property definition '{}' already exists for resource type {}",
                name, resource_type_id
            )));
        }
        store.property_definitions.push(definition.clone());

        tracing::info!(name = %name, resource_type_id, "Created property definition");
        Ok(definition)
    }

    async fn read_property_definition(
        &self,
        name: &str,
        resource_type_id: i32,
    ) -> Result<PropertyDefinition> {
        let store = self.store().read().await;
        store
            .property_definitions
            .iter()
            .find(|d| d.name == name && d.resource_type_id == resource_type_id)
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Property definition '{}' for resource type {}",
                    name, resource_type_id
                ))
            })
    }

    async fn read_all_property_definitions(
        &self,
        resource_type_id: i32,
    ) -> Result<Vec<PropertyDefinition>> {
        let store = self.store().read().await;
        let mut definitions: Vec<PropertyDefinition> = store
            .property_definitions
            .iter()
            .filter(|d| d.resource_type_id == resource_type_id)
            .cloned()
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(definitions)
    }

    async fn delete_property_definition(&self, name: &str, resource_type_id: i32) -> Result<()> {
        let mut store = self.store().write().await;
        let before = store.property_definitions.len();
        store
            .property_definitions
            .retain(|d| !(d.name == name && d.resource_type_id == resource_type_id));

        if store.property_definitions.len() == before {
            return Err(Error::NotFound(format!(
                "Property definition '{}' for resource type {}",
                name, resource_type_id
            )));
        }

        tracing::info!(name = %name, resource_type_id, "Deleted property definition");
        Ok(())
    }
}
