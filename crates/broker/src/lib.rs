//! Resource broker contracts and the in-memory broker
//!
//! A resource broker persists the CMS entities. Each concept has one
//! capability trait; [`ResourceBroker`] is the union every full broker
//! implements. [`InMemoryBroker`] keeps everything in process memory.

pub mod contracts;
pub mod memory;

pub use contracts::{
    PrincipalBroker, ProjectBroker, PropertyBroker, ReferenceDataBroker, ResourceBroker,
    TaskBroker,
};
pub use memory::InMemoryBroker;
