//! Configuration model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::commands::GuildId;
use crate::error::{HeraldError, HeraldResult};
use crate::validation::is_valid_name;

/// Loader and synchronization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    /// Root directory of the definition files
    pub folder: PathBuf,
    /// Folder holding the owner command's subcommands
    pub owner_command: String,
    /// Guild the owner command is installed in
    pub owner_server: Option<GuildId>,
    /// Install the main tree in this guild instead of globally
    pub single_server: Option<GuildId>,
    /// Turn top-level folders into group commands
    #[serde(alias = "auto_sub_commands")]
    pub folders_as_groups: bool,
    /// Load `#debug` and fall back to a single server
    pub debug: bool,
    /// `dm_permission` of commands that don't declare it
    pub default_dm_permission: bool,
    /// Extensions of definition files, without the dot
    pub command_file_extensions: Vec<String>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("commands"),
            owner_command: "owner".to_string(),
            owner_server: None,
            single_server: None,
            folders_as_groups: true,
            debug: false,
            default_dm_permission: false,
            command_file_extensions: ["toml", "json", "yaml", "yml"]
                .into_iter()
                .map(String::from)
                .collect(),
            logging: LoggingConfig::default(),
        }
    }
}

impl HeraldConfig {
    /// Reject settings the loader cannot work with
    pub fn validate(&self) -> HeraldResult<()> {
        if self.command_file_extensions.is_empty() {
            return Err(HeraldError::config(
                "command_file_extensions must list at least one extension",
            ));
        }
        if let Some(ext) = self
            .command_file_extensions
            .iter()
            .find(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(HeraldError::config(format!(
                "Invalid command file extension '{}'",
                ext
            )));
        }
        if !is_valid_name(&self.owner_command) {
            return Err(HeraldError::config_with_context(
                format!(
                    "Owner subfolder must have a valid command name; got '{}'",
                    self.owner_command
                ),
                "owner_command",
            ));
        }
        self.logging.validate()
    }

    /// Expand `~` and environment variables in `folder`
    pub fn expand_paths(&mut self) -> HeraldResult<()> {
        let raw = self.folder.to_string_lossy().into_owned();
        let expanded = shellexpand::full(&raw).map_err(|e| {
            HeraldError::config_with_context(
                format!("Failed to expand folder path: {}", e),
                raw.clone(),
            )
        })?;
        self.folder = PathBuf::from(expanded.into_owned());
        Ok(())
    }

    /// Guild that replaces the default scope, if any
    ///
    /// Debug mode falls back to the owner server, then to `first_guild`.
    pub fn effective_single_server(&self, first_guild: Option<GuildId>) -> Option<GuildId> {
        if self.single_server.is_some() || !self.debug {
            return self.single_server;
        }
        self.owner_server.or(first_guild)
    }

    /// Merge another configuration over this one
    ///
    /// Options only override when set; flags are taken from `other`.
    pub fn merge(&mut self, other: HeraldConfig) {
        let defaults = HeraldConfig::default();
        if other.folder != defaults.folder {
            self.folder = other.folder;
        }
        if other.owner_command != defaults.owner_command {
            self.owner_command = other.owner_command;
        }
        if other.owner_server.is_some() {
            self.owner_server = other.owner_server;
        }
        if other.single_server.is_some() {
            self.single_server = other.single_server;
        }
        self.folders_as_groups = other.folders_as_groups;
        self.debug = other.debug;
        self.default_dm_permission = other.default_dm_permission;
        if !other.command_file_extensions.is_empty() {
            self.command_file_extensions = other.command_file_extensions;
        }
        self.logging.merge(other.logging);
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Merge with another logging config
    pub fn merge(&mut self, other: LoggingConfig) {
        if !other.level.is_empty() {
            self.level = other.level;
        }
        if !other.format.is_empty() {
            self.format = other.format;
        }
    }

    fn validate(&self) -> HeraldResult<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        const FORMATS: [&str; 3] = ["json", "pretty", "compact"];

        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(HeraldError::config(format!(
                "Invalid log level: {}",
                self.level
            )));
        }
        if !FORMATS.contains(&self.format.as_str()) {
            return Err(HeraldError::config(format!(
                "Invalid log format: {}",
                self.format
            )));
        }
        Ok(())
    }
}
