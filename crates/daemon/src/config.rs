// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State engine configuration, loaded from TOML

use huddle_core::{UniquenessPolicy, DEFAULT_MAX_SUFFIX};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Topic written on first initialization
pub const DEFAULT_TOPIC: &str = "Random chatter";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where the transcript lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persistence {
    /// Transcript file with commit-offset recovery
    #[default]
    Disk,
    /// Transcript kept in memory only, lost on restart
    Memory,
}

/// State engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Storage root holding `chats`, `.chatsize`, `topic` and `tmp/`
    pub data_dir: PathBuf,
    pub default_topic: String,
    pub uniqueness: UniquenessPolicy,
    /// Log join, leave and restart lines to the transcript
    pub announcements: bool,
    pub persistence: Persistence,
    pub max_handle_suffix: u32,
    /// Static payload served as the index page (usually `index.html.gz`)
    pub asset: Option<PathBuf>,
    /// Upper bound on a long-poll; `None` waits indefinitely
    #[serde(with = "humantime_serde")]
    pub long_poll_timeout: Option<Duration>,
    /// Daemon log file; stderr when unset
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_topic: DEFAULT_TOPIC.to_string(),
            uniqueness: UniquenessPolicy::default(),
            announcements: true,
            persistence: Persistence::default(),
            max_handle_suffix: DEFAULT_MAX_SUFFIX,
            asset: None,
            long_poll_timeout: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Defaults, rooted at `data_dir`
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml(&content)
    }
}

/// `$XDG_STATE_HOME/huddle`, or `./var` where there is no state dir
fn default_data_dir() -> PathBuf {
    dirs::state_dir()
        .map(|dir| dir.join("huddle"))
        .unwrap_or_else(|| PathBuf::from("var"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
