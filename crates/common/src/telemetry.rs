//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::{CmsConfig, LogFormat};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` from the config drives the filter. Calling this more than once
/// is harmless: later calls leave the first subscriber in place.
#[mutants::skip] // Installs global state, nothing observable to assert on
pub fn init_tracing(config: &CmsConfig) {
    let filter =
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
