//! Remote registry capability

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::commands::{CommandData, Scope};

/// Identifier the remote registry assigned to a command
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub String);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A command as stored by the remote registry (the resource handle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCommand {
    pub id: CommandId,
    pub name: String,
    pub data: CommandData,
}

/// Failure reported by the remote registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The daily per-scope command create quota is exhausted
    #[error("Max number of daily application command creates has been reached for {scope}")]
    RateLimited { scope: Scope },

    /// The addressed command does not exist (any more)
    #[error("Unknown application command {id} in {scope}")]
    NotFound { scope: Scope, id: CommandId },

    /// Any other failure
    #[error("Remote registry error: {message}")]
    Other { message: String },
}

impl RemoteError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The per-scope command lists of the remote platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteRegistry: Send + Sync {
    /// List the commands installed in a scope
    async fn list(&self, scope: Scope) -> Result<Vec<RemoteCommand>, RemoteError>;

    /// Create one command
    async fn create(&self, scope: Scope, data: &CommandData) -> Result<RemoteCommand, RemoteError>;

    /// Overwrite an existing command
    async fn edit(
        &self,
        scope: Scope,
        id: &CommandId,
        data: &CommandData,
    ) -> Result<RemoteCommand, RemoteError>;

    /// Delete a command
    async fn delete(&self, scope: Scope, id: &CommandId) -> Result<(), RemoteError>;

    /// Replace a scope's whole command list
    async fn replace_all(
        &self,
        scope: Scope,
        data: &[CommandData],
    ) -> Result<Vec<RemoteCommand>, RemoteError>;
}
