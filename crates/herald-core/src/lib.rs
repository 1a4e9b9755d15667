//! Herald Core Library
//!
//! This crate loads chat-bot command definitions from a folder of
//! descriptor files, validates them against the platform's naming and shape
//! rules, keeps the remote per-scope command lists in step with them, and
//! routes incoming interactions to the bound handlers.

pub mod commands;
pub mod config;
pub mod error;
pub mod herald;
pub mod interaction;
pub mod remote;
pub mod router;
pub mod sync;
pub mod tree;
pub mod validation;

// Re-export commonly used types
pub use commands::{
    AllScopes, AutocompleteHandler, Command, CommandBinding, CommandData, CommandDefinition,
    CommandHandler, CommandKind, CommandOption, GuildId, HandlerRegistry, OptionType, Scope,
    ScopeFilter, ScopePolicy, autocomplete_fn, handler_fn,
};
pub use config::{HeraldConfig, LoggingConfig, load_config};
pub use error::{HeraldError, HeraldResult, LoadError};
pub use herald::Herald;
pub use interaction::{AutocompleteInteraction, CommandInteraction, InteractionEvent};
pub use remote::{MemoryRegistry, RemoteCommand, RemoteError, RemoteRegistry};
pub use router::{InteractionRouter, RouteOutcome, RoutingError};
pub use sync::{ReconcileReport, ScopeRegistry, SyncPlan, Synchronizer, plan};
pub use tree::{CommandTree, CommandTreeBuilder, LoadSettings, LocalFs};
pub use validation::{validate_command, validate_name};
