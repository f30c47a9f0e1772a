//! Feed Configuration Module
//!
//! Loads publisher settings from an optional TOML file with `MOLDFEED_`
//! environment overrides, and turns them into codec values.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use feed_codec::{FramingConfig, SessionId, SessionSequencer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides, e.g. `MOLDFEED_SESSION__ID=FEED01`
pub const ENV_PREFIX: &str = "MOLDFEED";

/// Complete moldfeed configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub session: SessionSettings,
    pub framing: FramingConfig,
    pub logging: LoggingSettings,
}

/// MoldUDP64 session identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Up to 10 ASCII bytes, zero padded on the wire
    pub id: String,
    /// Sequence number of the first message in the session
    pub initial_sequence: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            id: "SESSION1".to_string(),
            initial_sequence: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl FeedConfig {
    /// Load configuration with environment overrides
    ///
    /// Without a path only defaults and environment variables apply. A path
    /// that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub(crate) fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!("Loading feed config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // Values stay strings so numeric-looking session ids keep leading
        // zeros; typed fields are parsed during deserialization.
        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: FeedConfig = builder
            .build()
            .context("Failed to build feed configuration")?
            .try_deserialize()
            .context("Failed to deserialize feed configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings produce valid codec values
    pub fn validate(&self) -> Result<()> {
        self.framing
            .validate()
            .context("Invalid [framing] settings")?;
        self.session_id()?;
        Ok(())
    }

    pub fn session_id(&self) -> Result<SessionId> {
        SessionId::new(self.session.id.as_bytes())
            .with_context(|| format!("Invalid session id {:?}", self.session.id))
    }

    /// Publisher state starting at `initial_sequence`
    pub fn sequencer(&self) -> Result<SessionSequencer> {
        SessionSequencer::with_config(
            self.session_id()?,
            self.session.initial_sequence,
            self.framing,
        )
        .context("Failed to create session sequencer")
    }
}
