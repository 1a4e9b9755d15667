//! Configuration loading

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::model::HeraldConfig;
use crate::commands::GuildId;
use crate::error::{HeraldError, HeraldResult};

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A JSON, TOML or YAML file
    File(PathBuf),
    /// `HERALD_*` environment variables
    Environment,
    /// Built-in defaults
    Default,
}

/// Layers configuration sources in order; later sources win
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Load, merge, expand and validate
    pub fn load(self) -> HeraldResult<HeraldConfig> {
        let mut config = HeraldConfig::default();
        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading config from file: {}", path.display());
                    config.merge(load_file(path)?);
                }
                ConfigSource::Environment => {
                    tracing::debug!("Applying config from environment");
                    apply_env(&mut config)?;
                }
                ConfigSource::Default => config.merge(HeraldConfig::default()),
            }
        }

        config.expand_paths()?;
        config.validate()?;
        Ok(config)
    }
}

/// Load configuration from a file, falling back to defaults if it is missing
pub fn load_config(path: impl AsRef<Path>) -> HeraldResult<HeraldConfig> {
    ConfigLoader::new().with_file(path).load()
}

fn load_file(path: &Path) -> HeraldResult<HeraldConfig> {
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(HeraldConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        HeraldError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            HeraldError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            HeraldError::config_with_context(
                format!("Failed to parse YAML config: {}", e),
                format!("Deserializing YAML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            HeraldError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

fn apply_env(config: &mut HeraldConfig) -> HeraldResult<()> {
    if let Ok(folder) = env::var("HERALD_FOLDER") {
        config.folder = PathBuf::from(folder);
    }
    if let Ok(owner) = env::var("HERALD_OWNER_SERVER") {
        config.owner_server = Some(parse_guild("HERALD_OWNER_SERVER", &owner)?);
    }
    if let Ok(single) = env::var("HERALD_SINGLE_SERVER") {
        config.single_server = Some(parse_guild("HERALD_SINGLE_SERVER", &single)?);
    }
    if let Ok(debug) = env::var("HERALD_DEBUG") {
        config.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes");
    }
    if let Ok(level) = env::var("HERALD_LOG_LEVEL") {
        config.logging.level = level;
    }
    Ok(())
}

fn parse_guild(var: &str, value: &str) -> HeraldResult<GuildId> {
    value.parse().map_err(|_| {
        HeraldError::config_with_context(format!("Invalid guild id: {}", value), var.to_string())
    })
}
