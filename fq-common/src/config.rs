//! Configuration file resolution and TOML loading
//!
//! Config file resolution follows this priority order:
//! 1. Explicit path (highest priority, e.g. from the host's command line)
//! 2. Environment variable
//! 3. Platform config directory (`<config_dir>/flagquest/<file_name>`)
//!
//! A missing config file is never an error. Callers fall back to built-in
//! defaults when resolution yields `None`.

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "flagquest";

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve a config file path.
///
/// Returns the first candidate that exists on disk. An explicit path that
/// does not exist is reported and skipped rather than treated as fatal.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_var_name: &str,
    file_name: &str,
) -> Option<PathBuf> {
    // Priority 1: Explicit path
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!("Config file {} does not exist, ignoring", path.display());
    }

    // Priority 2: Environment variable
    if let Ok(value) = std::env::var(env_var_name) {
        let path = PathBuf::from(value);
        if path.exists() {
            return Some(path);
        }
        warn!(
            "{} points at missing config file {}, ignoring",
            env_var_name,
            path.display()
        );
    }

    // Priority 3: Platform config directory
    let path = default_config_path(file_name)?;
    if path.exists() {
        Some(path)
    } else {
        debug!("No config file at {}", path.display());
        None
    }
}

/// Platform default location for a FlagQuest config file
pub fn default_config_path(file_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(file_name))
}

/// Read and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Deserialize TOML text
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(toml::from_str(content)?)
}
