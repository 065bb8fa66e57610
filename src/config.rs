//! # Configuration
//!
//! Optional user defaults stored in `~/.config/cmdstat/config.json`, plus the
//! resolution of every path cmdstat touches.
//!
//! ## File Locations
//!
//! ```text
//! ~/.config/cmdstat/config.json        # this config ($CMDSTAT_CONFIG)
//! ~/.local/share/cmdstat/stats.json    # the store ($CMDSTAT_FILE)
//! ~/.local/share/cmdstat/logs/         # capture hook logs
//! ```
//!
//! The `directories` crate resolves the platform-appropriate locations.
//! Command-line flags always take precedence over values read here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::report::DEFAULT_LIMIT;
use crate::store::DEFAULT_LOCK_TIMEOUT;

/// Environment variable overriding the stats file location
pub const STATS_FILE_ENV: &str = "CMDSTAT_FILE";

/// Environment variable overriding the config file location
pub const CONFIG_FILE_ENV: &str = "CMDSTAT_CONFIG";

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of commands shown when `--all` is not given
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Default usage bar color (same syntax as `--bar-color`)
    #[serde(default)]
    pub bar_color: Option<String>,

    /// Default table columns (same names as `--columns`)
    #[serde(default)]
    pub columns: Vec<String>,

    /// How long writers wait for the store lock, in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Whether long output may be sent through `$PAGER`
    #[serde(default = "default_pager")]
    pub pager: bool,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT.as_millis() as u64
}

fn default_pager() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            bar_color: None,
            columns: Vec::new(),
            lock_timeout_ms: default_lock_timeout_ms(),
            pager: default_pager(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable config");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "cmdstat")
        .context("Could not determine the home directory")
}

/// Path to the config file, honoring `$CMDSTAT_CONFIG`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = env_path(CONFIG_FILE_ENV) {
        return Ok(path);
    }
    Ok(project_dirs()?.config_dir().join("config.json"))
}

/// Path to the stats file, honoring `$CMDSTAT_FILE`.
pub fn stats_file() -> Result<PathBuf> {
    if let Some(path) = env_path(STATS_FILE_ENV) {
        return Ok(path);
    }
    Ok(project_dirs()?.data_dir().join("stats.json"))
}

/// Directory the capture hook writes its logs to.
///
/// Lives next to the stats file so a relocated store keeps its logs close.
pub fn log_dir(stats_file: &Path) -> PathBuf {
    stats_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("logs")
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
