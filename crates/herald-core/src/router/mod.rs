//! Interaction routing
//!
//! Resolves an inbound event to the handler that serves it:
//!
//! ```text
//! InteractionEvent
//!     │
//!     ▼
//! ┌───────────────────────────────────────────────┐
//! │ InteractionRouter                             │
//! │  - top-level lookup (main tree, then guild)   │
//! │  - kind check (chat input / message / user)   │
//! └──────────────────────┬────────────────────────┘
//!                        │
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//! ┌─────────────────┐        ┌──────────────────────────┐
//! │ Leaf            │        │ Group                    │
//! │  run / complete │        │  subgroup → subcommand   │
//! └─────────────────┘        └──────────────────────────┘
//! ```
//!
//! Nothing here returns an error to the event loop: unknown commands, kind
//! mismatches and stale subcommand names are logged and reported as a
//! [`RouteOutcome`].

mod outcome;

pub use outcome::{RouteOutcome, RoutingError};

use parking_lot::RwLock;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::commands::{
    AutocompleteHandler, Command, CommandBody, CommandGroup, CommandHandler, CommandKind,
    Subcommand,
};
use crate::interaction::{
    AutocompleteInteraction, ChatInputData, CommandInteraction, InteractionEvent,
};
use crate::sync::ScopeRegistry;
use crate::tree::CommandTree;

/// Dispatches interaction events to command handlers
#[derive(Clone)]
pub struct InteractionRouter {
    tree: Arc<RwLock<CommandTree>>,
    guild_commands: Option<Arc<RwLock<ScopeRegistry>>>,
}

impl InteractionRouter {
    /// Route over a shared command tree
    pub fn new(tree: Arc<RwLock<CommandTree>>) -> Self {
        Self {
            tree,
            guild_commands: None,
        }
    }

    /// Also route to guild-scoped commands
    pub fn with_guild_commands(mut self, registry: Arc<RwLock<ScopeRegistry>>) -> Self {
        self.guild_commands = Some(registry);
        self
    }

    /// Look up a top-level command
    pub fn resolve(&self, name: &str) -> Option<Arc<Command>> {
        if let Some(command) = self.tree.read().get(name) {
            return Some(command.clone());
        }
        self.guild_commands
            .as_ref()
            .and_then(|registry| registry.read().command(name))
    }

    /// Route one event
    pub async fn dispatch(&self, event: &InteractionEvent) -> RouteOutcome {
        match event {
            InteractionEvent::Command(interaction) => self.dispatch_command(interaction).await,
            InteractionEvent::Autocomplete(interaction) => {
                self.dispatch_autocomplete(interaction).await
            }
        }
    }

    /// Route a command invocation
    pub async fn dispatch_command(&self, interaction: &CommandInteraction) -> RouteOutcome {
        let name = &interaction.command_name;
        let Some(command) = self.resolve(name) else {
            warn!(command = %name, "Received an interaction for an unknown command");
            return RouteOutcome::UnknownCommand(name.clone());
        };

        let received = interaction.data.kind();
        if received != command.kind {
            warn!(
                command = %name,
                expected = ?command.kind,
                received = ?received,
                "Interaction kind does not match the command"
            );
            return RouteOutcome::KindMismatch {
                command: name.clone(),
                expected: command.kind,
                received,
            };
        }

        let handler = match &command.body {
            CommandBody::Leaf(leaf) => leaf.run.clone(),
            CommandBody::Group(group) => {
                let empty = ChatInputData::default();
                let data = interaction.chat_input_data().unwrap_or(&empty);
                match find_subcommand(name, group, data) {
                    Ok(subcommand) => subcommand.run.clone(),
                    Err(err) => {
                        warn!(command = %name, error = %err, "Dropping interaction for a stale command tree");
                        return RouteOutcome::Stale(err);
                    }
                }
            }
        };

        debug!(command = %name, guild = ?interaction.guild_id, "Dispatching command");
        run_command(name, handler.as_ref(), interaction).await
    }

    /// Route an autocomplete request
    pub async fn dispatch_autocomplete(&self, interaction: &AutocompleteInteraction) -> RouteOutcome {
        let name = &interaction.command_name;
        let Some(command) = self.resolve(name) else {
            warn!(command = %name, "Received autocomplete for an unknown command");
            return RouteOutcome::UnknownCommand(name.clone());
        };

        if command.kind != CommandKind::ChatInput {
            warn!(command = %name, "Received autocomplete for a context menu command");
            return RouteOutcome::KindMismatch {
                command: name.clone(),
                expected: command.kind,
                received: CommandKind::ChatInput,
            };
        }

        let handler = match &command.body {
            CommandBody::Leaf(leaf) => leaf.autocomplete.clone(),
            CommandBody::Group(group) => {
                match find_subcommand(name, group, &interaction.data) {
                    Ok(subcommand) => subcommand.autocomplete.clone(),
                    Err(err) => {
                        warn!(command = %name, error = %err, "Dropping autocomplete for a stale command tree");
                        return RouteOutcome::Stale(err);
                    }
                }
            }
        };

        let Some(handler) = handler else {
            warn!(command = %name, "Received autocomplete, but the command has no autocomplete handler");
            return RouteOutcome::NoAutocomplete(name.clone());
        };

        run_autocomplete(name, handler.as_ref(), interaction).await
    }
}

/// Walk a group command's maps to the addressed subcommand
fn find_subcommand<'a>(
    command: &str,
    group: &'a CommandGroup,
    data: &ChatInputData,
) -> Result<&'a Subcommand, RoutingError> {
    let Some(subcommand) = data.subcommand.as_deref() else {
        return Err(RoutingError::MissingSubcommand {
            command: command.to_string(),
        });
    };

    let group_name = data.subcommand_group.as_deref();
    if let Some(group_name) = group_name {
        if !group.subcommand_groups.contains_key(group_name) {
            return Err(RoutingError::UnknownSubcommandGroup {
                command: command.to_string(),
                group: group_name.to_string(),
            });
        }
    }

    group
        .subcommand(group_name, subcommand)
        .ok_or_else(|| RoutingError::UnknownSubcommand {
            command: command.to_string(),
            group: group_name.map(str::to_string),
            subcommand: subcommand.to_string(),
        })
}

async fn run_command(
    name: &str,
    handler: &dyn CommandHandler,
    interaction: &CommandInteraction,
) -> RouteOutcome {
    match handler.run(interaction).await {
        Ok(()) => RouteOutcome::Handled,
        Err(err) => {
            error!(command = %name, error = %err, "Command handler failed");
            RouteOutcome::HandlerFailed {
                command: name.to_string(),
                message: err.to_string(),
            }
        }
    }
}

async fn run_autocomplete(
    name: &str,
    handler: &dyn AutocompleteHandler,
    interaction: &AutocompleteInteraction,
) -> RouteOutcome {
    match handler.complete(interaction).await {
        Ok(()) => RouteOutcome::Handled,
        Err(err) => {
            error!(command = %name, error = %err, "Autocomplete handler failed");
            RouteOutcome::HandlerFailed {
                command: name.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests;
