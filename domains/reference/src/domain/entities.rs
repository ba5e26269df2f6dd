//! Reference data rows
//!
//! Lookup tables edited by administrators and read everywhere else. Lists are
//! presented by ascending priority, ties broken by name.

use serde::{Deserialize, Serialize};
use validator::ValidateUrl;

use cms_common::{Error, Result};

fn check_names(kind: &str, name: &str, short_name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(format!("{} name must not be empty", kind)));
    }
    if short_name.trim().is_empty() {
        return Err(Error::Validation(format!(
            "{} short name must not be empty",
            kind
        )));
    }
    Ok(())
}

/// Rows that are listed by priority
pub trait Prioritized {
    fn priority(&self) -> i32;
    fn name(&self) -> &str;
}

/// Sort reference rows by (priority, name)
pub fn sort_by_priority<T: Prioritized>(rows: &mut [T]) {
    rows.sort_by(|a, b| {
        a.priority()
            .cmp(&b.priority())
            .then_with(|| a.name().cmp(b.name()))
    });
}

/// Category row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub short_name: String,
    pub priority: i32,
}

impl Category {
    pub fn new(id: i32, name: String, short_name: String, priority: i32) -> Result<Self> {
        check_names("Category", &name, &short_name)?;
        Ok(Self {
            id,
            name,
            short_name,
            priority,
        })
    }
}

/// Country row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i32,
    pub name: String,
    pub short_name: String,
    pub priority: i32,
}

impl Country {
    pub fn new(id: i32, name: String, short_name: String, priority: i32) -> Result<Self> {
        check_names("Country", &name, &short_name)?;
        Ok(Self {
            id,
            name,
            short_name,
            priority,
        })
    }
}

/// Language row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: i32,
    pub name: String,
    pub short_name: String,
    pub priority: i32,
}

impl Language {
    pub fn new(id: i32, name: String, short_name: String, priority: i32) -> Result<Self> {
        check_names("Language", &name, &short_name)?;
        Ok(Self {
            id,
            name,
            short_name,
            priority,
        })
    }
}

macro_rules! impl_prioritized {
    ($($ty:ty),*) => {
        $(
            impl Prioritized for $ty {
                fn priority(&self) -> i32 {
                    self.priority
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

impl_prioritized!(Category, Country, Language);

/// URL under which a site is reachable
///
/// A site has one primary URL (`primary_url_id` is `None`) and any number of
/// aliases pointing at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUrls {
    pub id: i32,
    pub url: String,
    pub site_id: i32,
    pub primary_url_id: Option<i32>,
}

impl SiteUrls {
    pub fn new(id: i32, url: String, site_id: i32, primary_url_id: Option<i32>) -> Result<Self> {
        if !url.validate_url() {
            return Err(Error::Validation(format!("Invalid site URL '{}'", url)));
        }
        if primary_url_id == Some(id) {
            return Err(Error::Validation(
                "A site URL cannot be an alias of itself".to_string(),
            ));
        }
        Ok(Self {
            id,
            url,
            site_id,
            primary_url_id,
        })
    }

    pub fn is_primary(&self) -> bool {
        self.primary_url_id.is_none()
    }
}
