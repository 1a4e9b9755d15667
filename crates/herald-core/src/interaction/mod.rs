//! Inbound interaction events
//!
//! The event-delivery collaborator hands the router discrete events: either
//! a command invocation or an autocomplete request. Chat-input events carry
//! the resolved subcommand group / subcommand names and the option values;
//! context-menu events carry the id of the targeted message or user.

use serde::{Deserialize, Serialize};

use crate::commands::{CommandKind, GuildId};

/// An event addressed to the command tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// A command was invoked
    Command(CommandInteraction),
    /// The user is typing into an autocomplete-enabled option
    Autocomplete(AutocompleteInteraction),
}

impl InteractionEvent {
    /// Name of the top-level command the event addresses
    pub fn command_name(&self) -> &str {
        match self {
            InteractionEvent::Command(i) => &i.command_name,
            InteractionEvent::Autocomplete(i) => &i.command_name,
        }
    }
}

/// A command invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInteraction {
    pub command_name: String,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    pub data: InvocationData,
}

/// Surface-specific payload of an invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationData {
    /// Slash command typed in the chat input
    ChatInput(ChatInputData),
    /// Context-menu action on a message
    Message { target_id: u64 },
    /// Context-menu action on a user
    User { target_id: u64 },
}

impl InvocationData {
    /// The command kind this payload can be delivered to
    pub fn kind(&self) -> CommandKind {
        match self {
            InvocationData::ChatInput(_) => CommandKind::ChatInput,
            InvocationData::Message { .. } => CommandKind::MessageContextMenu,
            InvocationData::User { .. } => CommandKind::UserContextMenu,
        }
    }
}

/// Resolved chat-input options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatInputData {
    #[serde(default)]
    pub subcommand_group: Option<String>,
    #[serde(default)]
    pub subcommand: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionValue>,
}

impl ChatInputData {
    /// Value of the named option
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.options.iter().find(|o| o.name == name).map(|o| &o.value)
    }
}

/// A supplied option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub name: String,
    pub value: serde_json::Value,
    /// Set on the option being typed in an autocomplete request
    #[serde(default)]
    pub focused: bool,
}

/// An autocomplete request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteInteraction {
    pub command_name: String,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    pub data: ChatInputData,
}

impl AutocompleteInteraction {
    /// Create an autocomplete request for a command
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            guild_id: None,
            data: ChatInputData::default(),
        }
    }

    /// Address a subcommand
    pub fn with_subcommand(mut self, group: Option<&str>, subcommand: impl Into<String>) -> Self {
        self.data.subcommand_group = group.map(str::to_string);
        self.data.subcommand = Some(subcommand.into());
        self
    }

    /// Set the option being typed
    pub fn with_focused(mut self, name: impl Into<String>, partial: impl Into<String>) -> Self {
        self.data.options.push(OptionValue {
            name: name.into(),
            value: serde_json::Value::String(partial.into()),
            focused: true,
        });
        self
    }

    /// The option being typed
    pub fn focused(&self) -> Option<&OptionValue> {
        self.data.options.iter().find(|o| o.focused)
    }
}

impl CommandInteraction {
    /// A chat-input invocation
    pub fn chat_input(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            guild_id: None,
            data: InvocationData::ChatInput(ChatInputData::default()),
        }
    }

    /// A message context-menu invocation
    pub fn message(command_name: impl Into<String>, target_id: u64) -> Self {
        Self {
            command_name: command_name.into(),
            guild_id: None,
            data: InvocationData::Message { target_id },
        }
    }

    /// A user context-menu invocation
    pub fn user(command_name: impl Into<String>, target_id: u64) -> Self {
        Self {
            command_name: command_name.into(),
            guild_id: None,
            data: InvocationData::User { target_id },
        }
    }

    /// Set the guild the invocation came from
    pub fn in_guild(mut self, guild: GuildId) -> Self {
        self.guild_id = Some(guild);
        self
    }

    /// Address a subcommand. No effect on context-menu invocations.
    pub fn with_subcommand(mut self, group: Option<&str>, subcommand: impl Into<String>) -> Self {
        if let InvocationData::ChatInput(data) = &mut self.data {
            data.subcommand_group = group.map(str::to_string);
            data.subcommand = Some(subcommand.into());
        }
        self
    }

    /// Add an option value. No effect on context-menu invocations.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        if let InvocationData::ChatInput(data) = &mut self.data {
            data.options.push(OptionValue {
                name: name.into(),
                value: value.into(),
                focused: false,
            });
        }
        self
    }

    /// Chat-input payload, if any
    pub fn chat_input_data(&self) -> Option<&ChatInputData> {
        match &self.data {
            InvocationData::ChatInput(data) => Some(data),
            _ => None,
        }
    }
}
