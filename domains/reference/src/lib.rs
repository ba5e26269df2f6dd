//! Reference data: categories, countries, languages and site URLs

pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{sort_by_priority, Category, Country, Language, Prioritized, SiteUrls};
