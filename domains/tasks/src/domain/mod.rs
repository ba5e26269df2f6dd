//! Tasks domain layer: entities and state machine

pub mod entities;
pub mod state;
