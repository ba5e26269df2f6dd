//! Shared configuration, error handling and tracing setup for the CMS resource layer
//!
//! This crate provides the ambient pieces every domain crate relies on:
//! - Configuration loaded from the environment
//! - The common error type and result alias
//! - State machine errors shared by the domain state machines
//! - Tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;

pub use config::{CmsConfig, LogFormat};
pub use error::{Error, Result};
pub use state::StateError;
pub use telemetry::init_tracing;
