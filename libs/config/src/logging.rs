//! Tracing subscriber bootstrap

use crate::feed_config::LoggingSettings;
use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter from `RUST_LOG` when set, else from the configured level
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("Invalid log level directive {:?}", settings.level)),
    }
}

/// Install the global tracing subscriber
///
/// Fails if the level directive does not parse or a subscriber is already
/// installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let filter = env_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if settings.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };
    installed.context("Failed to install tracing subscriber")?;

    tracing::debug!(level = %settings.level, json = settings.json, "logging initialized");
    Ok(())
}
