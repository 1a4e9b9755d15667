//! Loaded command tree nodes

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::data::{CommandData, CommandDefinition};
use super::option::{CommandKind, CommandOption};
use crate::commands::handler::{AutocompleteHandler, CommandHandler};

/// A top-level command
///
/// `name` and `subfolder` are fixed once the command is loaded; middleware
/// may change everything else before validation.
#[derive(Clone)]
pub struct Command {
    /// Command name, unique in the tree
    pub name: String,
    /// Description (chat-input commands only)
    pub description: Option<String>,
    /// Invocation surface
    pub kind: CommandKind,
    /// Options in declaration order. For groups these are derived from the
    /// group's maps.
    pub options: Vec<CommandOption>,
    /// Permission bit set a member needs by default, as a decimal string
    pub default_member_permissions: Option<String>,
    /// Whether the command is usable in direct messages
    pub dm_permission: bool,
    /// Age-restricted command
    pub nsfw: bool,
    /// Directory the command was loaded from, relative to the root
    pub subfolder: String,
    /// What runs when the command is invoked
    pub body: CommandBody,
}

/// Dispatch target of a command
#[derive(Clone)]
pub enum CommandBody {
    /// A single handler for the whole command
    Leaf(LeafBody),
    /// A command whose options are subcommands and subcommand groups
    Group(CommandGroup),
}

/// Handlers of a leaf command
#[derive(Clone)]
pub struct LeafBody {
    pub run: Arc<dyn CommandHandler>,
    pub autocomplete: Option<Arc<dyn AutocompleteHandler>>,
}

/// Subcommands and subcommand groups of a group command
#[derive(Clone, Default)]
pub struct CommandGroup {
    pub subcommands: BTreeMap<String, Subcommand>,
    pub subcommand_groups: BTreeMap<String, SubcommandGroup>,
}

/// A named set of subcommands one level below a group command
#[derive(Clone)]
pub struct SubcommandGroup {
    pub name: String,
    pub description: String,
    pub subcommands: BTreeMap<String, Subcommand>,
}

/// A leaf of a group command
#[derive(Clone)]
pub struct Subcommand {
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
    pub run: Arc<dyn CommandHandler>,
    pub autocomplete: Option<Arc<dyn AutocompleteHandler>>,
}

impl Command {
    /// Build a command from its definition, applying load-time defaults
    pub fn from_definition(
        name: impl Into<String>,
        subfolder: impl Into<String>,
        definition: CommandDefinition,
        body: CommandBody,
        default_dm_permission: bool,
    ) -> Self {
        let options = match &body {
            CommandBody::Group(group) => group.to_options(),
            CommandBody::Leaf(_) => definition.options.unwrap_or_default(),
        };

        Self {
            name: name.into(),
            description: definition.description,
            kind: definition.kind.unwrap_or_default(),
            options,
            default_member_permissions: definition.default_member_permissions,
            dm_permission: definition.dm_permission.unwrap_or(default_dm_permission),
            nsfw: definition.nsfw,
            subfolder: subfolder.into(),
            body,
        }
    }

    /// Whether this is a group command
    pub fn is_group(&self) -> bool {
        matches!(self.body, CommandBody::Group(_))
    }

    /// The group body, if this is a group command
    pub fn as_group(&self) -> Option<&CommandGroup> {
        match &self.body {
            CommandBody::Group(group) => Some(group),
            CommandBody::Leaf(_) => None,
        }
    }

    /// The autocomplete handler of a leaf command
    pub fn autocomplete_handler(&self) -> Option<&Arc<dyn AutocompleteHandler>> {
        match &self.body {
            CommandBody::Leaf(leaf) => leaf.autocomplete.as_ref(),
            CommandBody::Group(_) => None,
        }
    }

    /// Payload for the remote registry
    pub fn data(&self) -> CommandData {
        self.data_with_options(self.options.clone())
    }

    /// Payload for the remote registry with a replacement option list
    pub fn data_with_options(&self, options: Vec<CommandOption>) -> CommandData {
        CommandData {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            options,
            default_member_permissions: self.default_member_permissions.clone(),
            dm_permission: self.dm_permission,
            nsfw: self.nsfw,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("subfolder", &self.subfolder)
            .field("group", &self.is_group())
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}

impl CommandGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a subcommand, directly under the group or inside a
    /// subcommand group
    pub fn subcommand(&self, group: Option<&str>, name: &str) -> Option<&Subcommand> {
        match group {
            Some(group) => self.subcommand_groups.get(group)?.subcommands.get(name),
            None => self.subcommands.get(name),
        }
    }

    /// Wire options: subcommands first, then subcommand groups, each in
    /// name order
    pub fn to_options(&self) -> Vec<CommandOption> {
        self.subcommands
            .values()
            .map(Subcommand::to_option)
            .chain(self.subcommand_groups.values().map(SubcommandGroup::to_option))
            .collect()
    }

    /// Number of subcommands, including those inside subcommand groups
    pub fn len(&self) -> usize {
        self.subcommands.len()
            + self
                .subcommand_groups
                .values()
                .map(|g| g.subcommands.len())
                .sum::<usize>()
    }

    /// Whether the group holds no subcommands at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubcommandGroup {
    /// Wire option of this subcommand group
    pub fn to_option(&self) -> CommandOption {
        CommandOption::subcommand_group(self.name.clone(), self.description.clone())
            .with_options(self.subcommands.values().map(Subcommand::to_option).collect())
    }
}

impl Subcommand {
    /// Wire option of this subcommand
    pub fn to_option(&self) -> CommandOption {
        CommandOption::subcommand(self.name.clone(), self.description.clone())
            .with_options(self.options.clone())
    }
}

impl fmt::Debug for LeafBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafBody")
            .field("autocomplete", &self.autocomplete.is_some())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subcommand")
            .field("name", &self.name)
            .field("options", &self.options.len())
            .field("autocomplete", &self.autocomplete.is_some())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for SubcommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubcommandGroup")
            .field("name", &self.name)
            .field("subcommands", &self.subcommands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandGroup")
            .field("subcommands", &self.subcommands.keys().collect::<Vec<_>>())
            .field("subcommand_groups", &self.subcommand_groups)
            .finish()
    }
}

impl fmt::Debug for CommandBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandBody::Leaf(leaf) => leaf.fmt(f),
            CommandBody::Group(group) => group.fmt(f),
        }
    }
}
