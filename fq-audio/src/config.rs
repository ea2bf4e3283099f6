//! Configuration for the playback controller
//!
//! Loaded from an optional TOML file. Every field has a built-in default, so
//! a missing file (or a missing section) yields a working controller.
//!
//! ```toml
//! max_queue_len = 8
//! event_capacity = 64
//!
//! [logging]
//! level = "debug"
//!
//! [preload]
//! desktop = "auto"
//! low_power = "metadata"
//! ```

use crate::playable::Preload;
use crate::Result;
use fq_common::config::{load_toml, parse_toml, resolve_config_path, LoggingConfig};
use fq_common::Error as ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FQ_AUDIO_CONFIG";

/// Config file name under the platform config directory
pub const CONFIG_FILE_NAME: &str = "audio.toml";

/// Playback controller configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Preload hint per device class (optional)
    #[serde(default)]
    pub preload: PreloadPolicy,

    /// Upper bound on deferred requests; unbounded when absent
    #[serde(default)]
    pub max_queue_len: Option<usize>,

    /// Notification channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

/// Preload hint used when a request does not specify one
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PreloadPolicy {
    #[serde(default = "default_desktop_preload")]
    pub desktop: Preload,

    #[serde(default = "default_low_power_preload")]
    pub low_power: Preload,
}

impl PreloadPolicy {
    /// Hint for the given device class
    pub fn for_device(&self, low_power: bool) -> Preload {
        if low_power {
            self.low_power
        } else {
            self.desktop
        }
    }
}

impl Default for PreloadPolicy {
    fn default() -> Self {
        Self {
            desktop: default_desktop_preload(),
            low_power: default_low_power_preload(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            preload: PreloadPolicy::default(),
            max_queue_len: None,
            event_capacity: default_event_capacity(),
        }
    }
}

fn default_event_capacity() -> usize {
    64
}

fn default_desktop_preload() -> Preload {
    Preload::Auto
}

fn default_low_power_preload() -> Preload {
    Preload::Metadata
}

impl ControllerConfig {
    /// Resolve and load the config file, falling back to defaults
    ///
    /// Resolution order: `explicit`, then `FQ_AUDIO_CONFIG`, then the
    /// platform config dir. A file that exists but fails to parse is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match resolve_config_path(explicit, CONFIG_ENV_VAR, CONFIG_FILE_NAME) {
            Some(path) => {
                info!("Loading audio config from {}", path.display());
                load_toml::<Self>(&path)?.validate()
            }
            None => {
                info!("No audio config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_toml::<Self>(content)?.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.event_capacity == 0 {
            return Err(ConfigError::Config(
                "event_capacity must be at least 1".to_string(),
            )
            .into());
        }
        Ok(self)
    }
}
