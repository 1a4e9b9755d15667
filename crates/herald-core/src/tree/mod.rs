//! Command tree loading
//!
//! The [`CommandTreeBuilder`] walks a root directory of definition files and
//! assembles the [`CommandTree`]:
//!
//! ```text
//! commands/
//! ├── ping.toml            → command "ping"
//! ├── admin/               → group "admin"        (folders-as-groups mode)
//! │   ├── #info.toml       →   group description
//! │   ├── kick.toml        →   subcommand "kick"
//! │   └── role/            →   subcommand group "role"
//! │       └── add.toml     →     subcommand "add"
//! ├── #guild/vote.toml     → guild command "vote"
//! ├── #debug/trace.toml    → loaded only in debug mode
//! └── owner/               → owner command (owner guild only)
//! ```
//!
//! Definition files describe a command; handlers are bound through the
//! [`HandlerRegistry`](crate::commands::HandlerRegistry) under the file's
//! path without extension (`"admin/kick"`).

mod builder;
mod discovery;
mod group;
mod middleware;
mod source;
mod special;

pub use builder::{CommandTreeBuilder, LoadSettings};
pub use middleware::{Middleware, MiddlewareChain};
pub use source::{DefinitionSource, LocalFs, SourceEntry, parse_definition};
pub use special::OWNER_COMMAND_DESCRIPTION;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::commands::{Command, CommandData};
use crate::error::LoadError;

/// Reserved prefix for folders and files the loader treats specially
pub const RESERVED_PREFIX: char = '#';
/// Folder loaded only in debug mode
pub const DEBUG_FOLDER: &str = "#debug";
/// Folder holding guild-scoped commands
pub const GUILD_FOLDER: &str = "#guild";
/// Stem of the file describing a group or subcommand group
pub const INFO_FILE_STEM: &str = "#info";

/// The loaded top-level commands, keyed by name
///
/// Insertion is append-only per name: loading a second command with a name
/// already present is a [`LoadError`].
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    commands: BTreeMap<String, Arc<Command>>,
}

impl CommandTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Fails if the name is taken.
    pub fn insert(&mut self, command: Command) -> Result<Arc<Command>, LoadError> {
        if let Some(existing) = self.commands.get(&command.name) {
            let message = if existing.subfolder == command.subfolder {
                format!(
                    "Command {} is defined more than once in subfolder \"{}\"",
                    command.name, command.subfolder
                )
            } else {
                format!(
                    "Can't load command {} of subfolder \"{}\", it already exists in subfolder \"{}\"",
                    command.name, command.subfolder, existing.subfolder
                )
            };
            return Err(LoadError::new(command.name, message));
        }

        let command = Arc::new(command);
        self.commands.insert(command.name.clone(), command.clone());
        Ok(command)
    }

    /// Swap in a reloaded command, returning the previous one
    pub fn replace(&mut self, command: Command) -> Option<Arc<Command>> {
        self.commands
            .insert(command.name.clone(), Arc::new(command))
    }

    /// Get a command by name
    pub fn get(&self, name: &str) -> Option<&Arc<Command>> {
        self.commands.get(name)
    }

    /// Check if a command exists
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Remove a command
    pub fn remove(&mut self, name: &str) -> Option<Arc<Command>> {
        self.commands.remove(name)
    }

    /// Commands in name order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.values()
    }

    /// Command names in order
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Get command count
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Payload of every command, for a bulk replace
    pub fn data(&self) -> Vec<CommandData> {
        self.commands.values().map(|c| c.data()).collect()
    }
}
