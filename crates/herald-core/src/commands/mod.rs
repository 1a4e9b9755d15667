//! Command model
//!
//! The types in this module describe a loaded command tree: top-level
//! [`Command`]s whose body is either a leaf handler or a [`CommandGroup`],
//! groups holding [`Subcommand`]s and [`SubcommandGroup`]s, and the
//! [`CommandData`] payload that is pushed to the remote registry.
//!
//! Handlers are bound explicitly through a [`HandlerRegistry`] keyed by the
//! path of the definition file that declared the command (`"ping"`,
//! `"admin/kick"`, `"admin/mod/warn"`).

pub mod handler;
pub mod types;

pub use handler::{
    AllScopes, AutocompleteHandler, CommandBinding, CommandHandler, HandlerRegistry, ScopeFilter,
    ScopePolicy, autocomplete_fn, handler_fn,
};
pub use types::{
    Command, CommandBody, CommandData, CommandDefinition, CommandGroup, CommandKind,
    CommandOption, GuildId, LeafBody, OptionChoice, OptionType, Scope, Subcommand,
    SubcommandGroup,
};
