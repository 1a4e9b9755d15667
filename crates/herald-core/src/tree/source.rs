//! Definition sources

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

use crate::commands::CommandDefinition;
use crate::error::{HeraldError, HeraldResult};

/// A directory entry as seen by the loader
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceEntry {
    pub name: String,
    pub is_dir: bool,
}

impl SourceEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Read access to the tree of definition files
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// List a directory. Entries are returned in name order.
    async fn read_dir(&self, path: &Path) -> HeraldResult<Vec<SourceEntry>>;

    /// Whether a file or directory exists at `path`
    async fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory
    async fn is_dir(&self, path: &Path) -> bool;

    /// Read a file to a string
    async fn read_to_string(&self, path: &Path) -> HeraldResult<String>;
}

/// The local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl DefinitionSource for LocalFs {
    async fn read_dir(&self, path: &Path) -> HeraldResult<Vec<SourceEntry>> {
        let mut entries = fs::read_dir(path).await.map_err(|e| {
            HeraldError::io_with_path(
                format!("Failed to read commands directory: {}", e),
                path.display().to_string(),
            )
        })?;

        let mut result = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            HeraldError::io_with_path(
                format!("Failed to read directory entry: {}", e),
                path.display().to_string(),
            )
        })? {
            let file_type = entry.file_type().await?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            result.push(SourceEntry {
                name,
                is_dir: file_type.is_dir(),
            });
        }

        result.sort();
        Ok(result)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn read_to_string(&self, path: &Path) -> HeraldResult<String> {
        fs::read_to_string(path).await.map_err(|e| {
            HeraldError::io_with_path(
                format!("Failed to read definition file: {}", e),
                path.display().to_string(),
            )
        })
    }
}

/// Parse a definition file by extension: TOML, YAML or JSON
pub fn parse_definition(path: &Path, content: &str) -> Result<CommandDefinition, String> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
        Some("yaml") | Some("yml") => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
        other => Err(format!(
            "Unsupported definition format: {}",
            other.unwrap_or("<none>")
        )),
    }
}
