//! Command schema validation
//!
//! Enforces the platform's naming and shape rules on a loaded [`Command`]
//! before it is inserted into the tree:
//!
//! - names match [`NAME_PATTERN`], are at most [`MAX_NAME_LENGTH`]
//!   characters and are lowercase
//! - chat-input commands, subcommands and options have a description of
//!   [`MIN_DESCRIPTION_LENGTH`]..=[`MAX_DESCRIPTION_LENGTH`] characters
//! - context-menu commands have neither description nor options
//! - subcommands and subcommand groups never share an option list with
//!   value options, groups contain only subcommands, and nothing nests
//!   deeper than group → subcommand group → subcommand
//! - autocomplete options have an autocomplete handler to answer them
//!
//! [`Command`]: crate::commands::Command

mod name;
mod validator;

pub use name::{
    MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MIN_DESCRIPTION_LENGTH, NAME_PATTERN, is_valid_name,
    validate_name,
};
pub use validator::{validate_command, validate_options};

#[cfg(test)]
mod tests;
