//! Shared fixtures for the integration tests
//!
//! - Test configuration loaded once from `.env.test` / `.env`
//! - A bootstrapped broker with an editor user and an `Editors` group

#![allow(dead_code)]

use std::sync::Once;

use anyhow::Result;
use cms_broker::{InMemoryBroker, PrincipalBroker};
use cms_common::{init_tracing, CmsConfig};
use cms_principals::{GroupFlags, User};

static INIT: Once = Once::new();

/// Load the test configuration and install tracing once per test binary
pub fn test_config() -> CmsConfig {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test").ok();
        dotenvy::dotenv().ok();
    });

    let config = CmsConfig::from_env().unwrap_or_default();
    init_tracing(&config);
    config
}

/// A bootstrapped broker plus its config
pub struct TestCms {
    pub config: CmsConfig,
    pub broker: InMemoryBroker,
}

impl TestCms {
    pub async fn new() -> Result<Self> {
        let config = test_config();
        let broker = InMemoryBroker::bootstrap(&config).await?;
        Ok(Self { config, broker })
    }

    /// Create a user in a new project-coworker group below the users group
    pub async fn create_editor(&self, name: &str, group: &str) -> Result<User> {
        if self.broker.read_group_by_name(group).await.is_err() {
            self.broker
                .create_group(
                    group,
                    "Editorial staff",
                    GroupFlags::PROJECT_COWORKER,
                    Some(&self.config.users_group),
                )
                .await?;
        }

        let user = self
            .broker
            .create_user(name, &format!("{}@example.com", name), "Editor")
            .await?;
        self.broker.add_user_to_group(user.id, group).await?;
        Ok(user)
    }

    pub async fn admin(&self) -> Result<User> {
        Ok(self.broker.read_user_by_name("Admin").await?)
    }
}
