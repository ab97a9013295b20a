//! # EvType Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for the EV Type Predictor,
//! handling loading, merging, validation, and access to configuration data.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.evtype.toml` in current directory or ancestors
//! 2. User-specific `<config dir>/evtype/config.toml`
//! 3. Default values defined in the code
//!
//! Command-line flags (`--data`, `--port`, ...) are applied on top of the merged
//! result by the individual commands.
//!
//! ## Examples
//!
//! ```toml
//! [dataset]
//! path = "~/data/Electric_Vehicle_Population_Data.csv"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8501
//! enable_cors = false
//! title = "EV Type Predictor"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let dataset_path = cfg.dataset_path(cli_override.as_deref());
//! ```
//!
use crate::common::loader::DatasetFormat;
use crate::core::error::{EvError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub server: ServerSection,
}

/// Where the vehicle dataset is loaded from.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Path to a `.csv` file or a supported archive (can use ~). Will be expanded.
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

/// Settings for `evtype srv`.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    /// Heading shown on the chat page.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
            title: default_title(),
        }
    }
}

fn default_dataset_path() -> String {
    "Electric_Vehicle_Population_Data.csv".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8501
}
fn default_enable_cors() -> bool {
    true
}
fn default_title() -> String {
    "Electric Vehicle Type Predictor".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".evtype.toml";

impl Config {
    /// Resolves the dataset path, preferring an explicit override (`--data` / `EVTYPE_DATA`).
    pub fn dataset_path(&self, cli_override: Option<&Path>) -> PathBuf {
        match cli_override {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(&self.dataset.path),
        }
    }
}

/// Loads the user configuration and merges the project `.evtype.toml` over it.
///
/// ## Returns
///
/// * `Result<Config>`: The merged and validated configuration. Missing files
///   fall back to defaults.
///
/// ## Errors
///
/// Returns an error if a configuration file exists but cannot be read or parsed,
/// or if the merged values fail validation (`EvError::Config`).
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "EvType", "evtype") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.evtype.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.evtype.toml`, stopping at a repository root.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.dataset.path = if project_cfg.dataset.path != default_dataset_path() {
        project_cfg.dataset.path
    } else {
        user.dataset.path
    };
    merged.server.host = if project_cfg.server.host != default_host() {
        project_cfg.server.host
    } else {
        user.server.host
    };
    merged.server.port = if project_cfg.server.port != default_port() {
        project_cfg.server.port
    } else {
        user.server.port
    };
    merged.server.enable_cors = if project_cfg.server.enable_cors != default_enable_cors() {
        project_cfg.server.enable_cors
    } else {
        user.server.enable_cors
    };
    merged.server.title = if project_cfg.server.title != default_title() {
        project_cfg.server.title
    } else {
        user.server.title
    };
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    config.dataset.path = shellexpand::tilde(&config.dataset.path).into_owned();
    debug!("Expanded dataset path: {}", config.dataset.path);
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let path = config.dataset.path.trim();
    if path.is_empty() {
        return Err(anyhow!(EvError::Config(
            "Dataset path cannot be empty.".to_string()
        )));
    }
    if DatasetFormat::from_name(path).is_none() {
        return Err(anyhow!(EvError::Config(format!(
            "Dataset path '{}' has an unsupported extension. Expected .csv, .csv.gz, .tar, .tar.gz or .tgz.",
            path
        ))));
    }
    if config.server.port == 0 {
        return Err(anyhow!(EvError::Config(
            "Server port must be between 1 and 65535.".to_string()
        )));
    }
    if config.server.host.parse::<std::net::IpAddr>().is_err() {
        return Err(anyhow!(EvError::Config(format!(
            "Invalid server host '{}'. Expected an IP address.",
            config.server.host
        ))));
    }
    debug!("Configuration validation successful.");
    Ok(())
}
