//! Resources domain: resource types, type handlers, property definitions and the CMS facade
//!
//! Resource type handlers never touch storage themselves. Every operation is
//! forwarded to a [`CmsObject`], the facade that owns locking, versioning and
//! persistence.

pub mod domain;
pub mod facade;
pub mod handlers;
pub mod mock;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{CmsFile, Properties, PropertyDefinition, ResourceType};
pub use domain::validation::{validate_property_name, validate_resource_name};
pub use facade::{CmsObject, RequestContext};
pub use handlers::{
    BinaryHandler, CompatiblePlainHandler, ImageHandler, JspHandler, ResourceTypeHandler,
    ResourceTypeRegistry,
};
pub use mock::{FacadeCall, InMemoryCmsObject};
