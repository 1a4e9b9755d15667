//! Definition files and remote payloads

use serde::{Deserialize, Serialize};

use super::option::{CommandKind, CommandOption};

/// What a definition file declares about one command
///
/// The command name comes from the file name, and handlers come from the
/// handler registry, so neither appears here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDefinition {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "type")]
    pub kind: Option<CommandKind>,
    #[serde(default)]
    pub options: Option<Vec<CommandOption>>,
    #[serde(default)]
    pub default_member_permissions: Option<String>,
    #[serde(default)]
    pub dm_permission: Option<bool>,
    #[serde(default)]
    pub nsfw: bool,
}

impl CommandDefinition {
    /// A chat-input definition with only a description
    pub fn chat_input(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// A context-menu definition
    pub fn context_menu(kind: CommandKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Set options
    pub fn with_options(mut self, options: Vec<CommandOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the default member permissions
    pub fn with_default_member_permissions(mut self, permissions: impl Into<String>) -> Self {
        self.default_member_permissions = Some(permissions.into());
        self
    }
}

/// Desired state of one command, as sent to the remote registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: CommandKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_member_permissions: Option<String>,
    #[serde(default)]
    pub dm_permission: bool,
    #[serde(default)]
    pub nsfw: bool,
}
