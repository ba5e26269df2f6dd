//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables; every key has a
//! default so an empty environment yields a working setup.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Public URL of the default site
    pub site_url: String,

    /// Short name of the default language
    pub default_language: String,

    /// Well-known groups and projects created at bootstrap
    pub online_project: String,
    pub admin_group: String,
    pub users_group: String,
    pub project_manager_group: String,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:8080".to_string(),
            default_language: "en".to_string(),
            online_project: "Online".to_string(),
            admin_group: "Administrators".to_string(),
            users_group: "Users".to_string(),
            project_manager_group: "Projectmanager".to_string(),
            rust_log: "cms=debug".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl CmsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Self::default();

        let log_format = match env::var("LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.log_format,
        };

        let config = Self {
            site_url: env::var("CMS_SITE_URL").unwrap_or(defaults.site_url),
            default_language: env::var("CMS_DEFAULT_LANGUAGE")
                .unwrap_or(defaults.default_language),
            online_project: env::var("CMS_ONLINE_PROJECT").unwrap_or(defaults.online_project),
            admin_group: env::var("CMS_ADMIN_GROUP").unwrap_or(defaults.admin_group),
            users_group: env::var("CMS_USERS_GROUP").unwrap_or(defaults.users_group),
            project_manager_group: env::var("CMS_PROJECT_MANAGER_GROUP")
                .unwrap_or(defaults.project_manager_group),
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            log_format,
        };

        if config.online_project.trim().is_empty() {
            return Err(anyhow::anyhow!("CMS_ONLINE_PROJECT must not be empty"));
        }

        Ok(config)
    }
}
