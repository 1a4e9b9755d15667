//! Routing results

use thiserror::Error;

use crate::commands::CommandKind;

/// The event addressed a subcommand the local tree does not have
///
/// Seen when the remote registry still serves a shape this process no
/// longer loads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Command '{command}' has no subcommand group '{group}'")]
    UnknownSubcommandGroup { command: String, group: String },

    #[error("Command '{command}' has no subcommand '{subcommand}'{}", in_group(.group))]
    UnknownSubcommand {
        command: String,
        group: Option<String>,
        subcommand: String,
    },

    #[error("Group command '{command}' was invoked without a subcommand")]
    MissingSubcommand { command: String },
}

fn in_group(group: &Option<String>) -> String {
    group
        .as_ref()
        .map(|g| format!(" in group '{}'", g))
        .unwrap_or_default()
}

/// What happened to a routed event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The handler ran and succeeded
    Handled,
    /// No command with this name is loaded
    UnknownCommand(String),
    /// The event's surface does not match the command's kind
    KindMismatch {
        command: String,
        expected: CommandKind,
        received: CommandKind,
    },
    /// Autocomplete was requested but no handler is configured
    NoAutocomplete(String),
    /// The addressed subcommand does not exist locally
    Stale(RoutingError),
    /// The handler returned an error
    HandlerFailed { command: String, message: String },
}

impl RouteOutcome {
    /// Whether a handler ran to completion
    pub fn is_handled(&self) -> bool {
        matches!(self, RouteOutcome::Handled)
    }

    /// Whether the event was dropped before reaching a handler
    pub fn is_dropped(&self) -> bool {
        !matches!(
            self,
            RouteOutcome::Handled | RouteOutcome::HandlerFailed { .. }
        )
    }
}
