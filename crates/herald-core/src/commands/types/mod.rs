//! Command type definitions

mod command;
mod data;
mod option;
mod scope;

pub use command::{Command, CommandBody, CommandGroup, LeafBody, Subcommand, SubcommandGroup};
pub use data::{CommandData, CommandDefinition};
pub use option::{CommandKind, CommandOption, OptionChoice, OptionType};
pub use scope::{GuildId, Scope};
