//! # moldfeed Configuration
//!
//! Settings and process bootstrap shared by everything that publishes or
//! consumes a moldfeed session: which session id and starting sequence to
//! use, how large frames may grow, and how to log.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feed_config::{init_logging, FeedConfig};
//! use std::path::Path;
//!
//! let config = FeedConfig::load(Some(Path::new("config/moldfeed.toml")))?;
//! init_logging(&config.logging)?;
//!
//! let mut sequencer = config.sequencer()?;
//! let frame = sequencer.frame(&[b"payload"])?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod feed_config;
pub mod logging;

pub use feed_config::{FeedConfig, LoggingSettings, SessionSettings, ENV_PREFIX};
pub use logging::{env_filter, init_logging};
