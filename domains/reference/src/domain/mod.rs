//! Reference data layer

pub mod entities;
