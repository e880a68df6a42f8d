//! Configuration file loading with precedence handling.

use crate::model::GroupId;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Name used in `start_collapsed` for the ungrouped bucket.
pub const UNGROUPED_KEY: &str = "ungrouped";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is not usable.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Why it was refused.
        reason: String,
    },

    /// No store file was given on the command line, in the environment or in the config file.
    #[error("No store file given (pass STORE, set REGROUP_STORE, or set store_path in the config file)")]
    MissingStore,
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/regroup/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// JSON store file to open when none is given on the command line.
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Refetch from the store after a failed write.
    #[serde(default)]
    pub refetch_on_failure: Option<bool>,

    /// Group ids collapsed at startup (`"ungrouped"` for the ungrouped bucket).
    #[serde(default)]
    pub start_collapsed: Option<Vec<String>>,

    /// Show item counts on group headers.
    #[serde(default)]
    pub show_counts: Option<bool>,

    /// Artificial delay added to every store call, in milliseconds.
    #[serde(default)]
    pub store_latency_ms: Option<u64>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// JSON store file, if any source named one.
    pub store_path: Option<PathBuf>,
    /// Where tracing output goes.
    pub log_file_path: PathBuf,
    /// Refetch after a failed write.
    pub refetch_on_failure: bool,
    /// Group ids collapsed at startup.
    pub start_collapsed: Vec<String>,
    /// Start with every group collapsed.
    pub collapse_all: bool,
    /// Show item counts on headers.
    pub show_counts: bool,
    /// Artificial delay before each store reply, in milliseconds.
    pub store_latency_ms: u64,
    /// Use colors in the TUI.
    pub color: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            log_file_path: default_log_path(),
            refetch_on_failure: true,
            start_collapsed: Vec::new(),
            collapse_all: false,
            show_counts: true,
            store_latency_ms: 0,
            color: true,
        }
    }
}

impl ResolvedConfig {
    /// Buckets named by `start_collapsed`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for an empty group id.
    pub fn collapsed_buckets(&self) -> Result<Vec<Option<GroupId>>, ConfigError> {
        self.start_collapsed
            .iter()
            .map(|raw| {
                if raw == UNGROUPED_KEY {
                    return Ok(None);
                }
                GroupId::new(raw.as_str())
                    .map(Some)
                    .map_err(|e| ConfigError::InvalidValue {
                        field: "start_collapsed",
                        reason: e.to_string(),
                    })
            })
            .collect()
    }

    /// The store file to open.
    ///
    /// # Errors
    ///
    /// Returns `MissingStore` if no source provided one.
    pub fn require_store_path(&self) -> Result<&PathBuf, ConfigError> {
        self.store_path.as_ref().ok_or(ConfigError::MissingStore)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/regroup/regroup.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("regroup").join("regroup.log")
    } else {
        PathBuf::from("regroup.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/regroup/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("regroup").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `REGROUP_CONFIG` environment variable
/// 3. Default path `~/.config/regroup/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("REGROUP_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        store_path: config.store_path.or(defaults.store_path),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        refetch_on_failure: config
            .refetch_on_failure
            .unwrap_or(defaults.refetch_on_failure),
        start_collapsed: config.start_collapsed.unwrap_or(defaults.start_collapsed),
        show_counts: config.show_counts.unwrap_or(defaults.show_counts),
        store_latency_ms: config.store_latency_ms.unwrap_or(defaults.store_latency_ms),
        ..defaults
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `REGROUP_STORE`: Override the store file
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(store) = std::env::var("REGROUP_STORE") {
        if !store.is_empty() {
            config.store_path = Some(PathBuf::from(store));
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    store_override: Option<PathBuf>,
    collapse_all: bool,
    no_color: bool,
) -> ResolvedConfig {
    if let Some(store) = store_override {
        config.store_path = Some(store);
    }

    if collapse_all {
        config.collapse_all = true;
    }

    if no_color {
        config.color = false;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
