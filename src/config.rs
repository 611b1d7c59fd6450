//! Configuration management for cmdroute.
//!
//! Handles loading engine settings, worker pool limits and caller-visible
//! message texts from a TOML file.

use crate::error::{CommandError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Engine-wide settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Background worker pool settings.
    #[serde(default)]
    pub workers: WorkerConfig,

    /// Caller-visible message texts.
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Engine-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Capability required by commands that do not declare one.
    #[serde(default = "default_capability")]
    pub default_capability: String,

    /// Canonical name of the command routed to the shutdown gate.
    #[serde(default = "default_shutdown_command")]
    pub shutdown_command: String,
}

fn default_capability() -> String {
    "commands.default".to_string()
}

fn default_shutdown_command() -> String {
    "stop".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_capability: default_capability(),
            shutdown_command: default_shutdown_command(),
        }
    }
}

/// Background worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Maximum number of asynchronous behaviors running at once (0 = unbounded).
    #[serde(default)]
    pub max_concurrent: usize,
}

/// Caller-visible message texts, passed through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MessagesConfig {
    pub console_not_allowed: String,
    pub no_permission: String,
    /// Prefixed to the usage string when a mandatory parameter is missing.
    pub usage_prefix: String,
    pub generic_failure: String,
    pub unknown_subcommand: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            console_not_allowed: "This command does not support execution from the console."
                .to_string(),
            no_permission: "You do not have permission to execute this command.".to_string(),
            usage_prefix: "Usage: ".to_string(),
            generic_failure: "An error occurred while executing this command, \
                              please contact an administrator."
                .to_string(),
            unknown_subcommand: "Unknown sub-command. Available commands:".to_string(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cmdroute")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CommandError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            CommandError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
