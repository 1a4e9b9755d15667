//! Per-guild command state

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::commands::{Command, CommandData, GuildId, ScopePolicy};
use crate::error::LoadError;
use crate::remote::RemoteCommand;
use crate::validation::validate_options;

/// A guild-scoped command and its remote handle in each guild
#[derive(Clone)]
pub struct GuildCommand {
    command: Arc<Command>,
    policy: Arc<dyn ScopePolicy>,
    handles: HashMap<GuildId, RemoteCommand>,
}

impl GuildCommand {
    pub fn new(command: Command, policy: Arc<dyn ScopePolicy>) -> Self {
        Self {
            command: Arc::new(command),
            policy,
            handles: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.command.name
    }

    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    /// Whether the policy wants the command in `guild`
    pub fn is_included(&self, guild: GuildId) -> bool {
        self.policy.should_create_for(guild)
    }

    /// Remote handle in `guild`, if one is known
    pub fn handle(&self, guild: GuildId) -> Option<&RemoteCommand> {
        self.handles.get(&guild)
    }

    /// Payload to install in `guild`
    ///
    /// Options supplied by the policy replace the static options as a whole
    /// and are validated like static ones.
    pub fn effective_data(&self, guild: GuildId) -> Result<CommandData, LoadError> {
        match self.policy.options_for(guild) {
            Some(options) => {
                validate_options(
                    &self.command.name,
                    &options,
                    self.command.autocomplete_handler().is_some(),
                )?;
                Ok(self.command.data_with_options(options))
            }
            None => Ok(self.command.data()),
        }
    }
}

impl fmt::Debug for GuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuildCommand")
            .field("name", &self.command.name)
            .field("guilds", &self.handles.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Guild commands keyed by name, with their per-guild handles
///
/// Handles are written only by the [`Synchronizer`](super::Synchronizer).
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    commands: BTreeMap<String, GuildCommand>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from loaded guild commands
    pub fn from_commands(commands: Vec<GuildCommand>) -> Result<Self, LoadError> {
        let mut registry = Self::new();
        for command in commands {
            registry.insert(command)?;
        }
        Ok(registry)
    }

    /// Add a guild command. Names are unique.
    pub fn insert(&mut self, command: GuildCommand) -> Result<(), LoadError> {
        if self.commands.contains_key(command.name()) {
            return Err(LoadError::new(
                command.name(),
                "Guild command is defined more than once.",
            ));
        }
        self.commands.insert(command.name().to_string(), command);
        Ok(())
    }

    /// Swap in a reloaded definition of an existing guild command
    ///
    /// The policy and the known handles are kept. Returns the previous
    /// command, or `None` (and changes nothing) if `name` is unknown.
    pub fn replace(&mut self, command: Command) -> Option<Arc<Command>> {
        let entry = self.commands.get_mut(&command.name)?;
        Some(std::mem::replace(&mut entry.command, Arc::new(command)))
    }

    pub fn get(&self, name: &str) -> Option<&GuildCommand> {
        self.commands.get(name)
    }

    /// The command behind a guild command name
    pub fn command(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(name).map(|c| c.command.clone())
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GuildCommand> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether `name` should exist in `guild`. Unknown names are never
    /// included.
    pub fn is_included(&self, name: &str, guild: GuildId) -> bool {
        self.commands
            .get(name)
            .is_some_and(|c| c.is_included(guild))
    }

    /// Whether `name` currently has a remote command in `guild`
    pub fn is_in(&self, name: &str, guild: GuildId) -> bool {
        self.handle(name, guild).is_some()
    }

    pub fn handle(&self, name: &str, guild: GuildId) -> Option<&RemoteCommand> {
        self.commands.get(name)?.handle(guild)
    }

    /// Record the remote command created or adopted for `name` in `guild`
    pub fn set_handle(&mut self, name: &str, guild: GuildId, handle: RemoteCommand) {
        if let Some(command) = self.commands.get_mut(name) {
            command.handles.insert(guild, handle);
        }
    }

    /// Forget the handle of `name` in `guild`
    pub fn clear_handle(&mut self, name: &str, guild: GuildId) -> Option<RemoteCommand> {
        self.commands.get_mut(name)?.handles.remove(&guild)
    }

    /// Forget every handle in `guild`; returns how many were dropped
    pub fn clear_scope(&mut self, guild: GuildId) -> usize {
        self.commands
            .values_mut()
            .filter_map(|c| c.handles.remove(&guild))
            .count()
    }
}
