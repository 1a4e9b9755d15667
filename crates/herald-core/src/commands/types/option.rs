//! Command kinds and option definitions

use serde::{Deserialize, Serialize};

/// The invocation surface a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// A slash command typed in the chat input
    #[default]
    ChatInput,
    /// A context-menu entry on a message
    MessageContextMenu,
    /// A context-menu entry on a user
    UserContextMenu,
}

impl CommandKind {
    /// Whether commands of this kind carry a description and options
    pub fn is_chat_input(self) -> bool {
        self == CommandKind::ChatInput
    }
}

/// Type of a command option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
    Subcommand,
    SubcommandGroup,
}

impl OptionType {
    /// Subcommands and subcommand groups structure a command instead of
    /// carrying a value
    pub fn is_subcommand_like(self) -> bool {
        matches!(self, OptionType::Subcommand | OptionType::SubcommandGroup)
    }
}

/// A fixed choice offered for a value option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionChoice {
    pub name: String,
    pub value: serde_json::Value,
}

/// An option of a chat-input command
///
/// Options nest: a `Subcommand` option holds value options, and a
/// `SubcommandGroup` option holds `Subcommand` options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandOption {
    /// Option name
    #[serde(default)]
    pub name: String,
    /// Option description
    #[serde(default)]
    pub description: String,
    /// Option type
    #[serde(rename = "type")]
    pub kind: OptionType,
    /// Whether the user must supply a value
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Whether values are suggested by an autocomplete handler
    #[serde(default, skip_serializing_if = "is_false")]
    pub autocomplete: bool,
    /// Fixed choices for value options
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    /// Nested options of subcommands and subcommand groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl CommandOption {
    /// Create a new option
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: OptionType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            autocomplete: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Create a subcommand option
    pub fn subcommand(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, OptionType::Subcommand)
    }

    /// Create a subcommand group option
    pub fn subcommand_group(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, OptionType::SubcommandGroup)
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Enable autocomplete
    pub fn with_autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }

    /// Add a fixed choice
    pub fn with_choice(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.choices.push(OptionChoice {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Set nested options
    pub fn with_options(mut self, options: Vec<CommandOption>) -> Self {
        self.options = options;
        self
    }
}
