//! Structural validation walk over commands and their options

use std::collections::HashSet;

use super::name::{matches_grammar, validate_description, validate_name};
use crate::commands::{Command, CommandBody, CommandGroup, CommandOption, OptionType};
use crate::error::LoadError;

/// Where autocomplete requests for an option would be answered
#[derive(Clone, Copy)]
enum AutocompleteSource<'a> {
    /// One handler for the whole command (or none)
    Single(bool),
    /// Each subcommand of the group brings its own handler
    Group(&'a CommandGroup),
}

impl AutocompleteSource<'_> {
    fn has_handler(&self, group: Option<&str>, subcommand: Option<&str>) -> bool {
        match self {
            AutocompleteSource::Single(has) => *has,
            AutocompleteSource::Group(tree) => subcommand
                .and_then(|name| tree.subcommand(group, name))
                .is_some_and(|sub| sub.autocomplete.is_some()),
        }
    }
}

/// Nesting position of an option list
#[derive(Clone, Copy)]
enum Level<'a> {
    /// Options of the top-level command
    Top,
    /// Options of a subcommand group
    InGroup(&'a str),
    /// Options of a subcommand, optionally inside a subcommand group
    InSubcommand(Option<&'a str>, &'a str),
}

/// Validate a loaded command
///
/// Errors name the top-level command so a failed load can be traced to its
/// definition.
pub fn validate_command(command: &Command) -> Result<(), LoadError> {
    let name = command.name.as_str();
    validate_name(name, name)?;

    if command.kind.is_chat_input() {
        let description = command
            .description
            .as_deref()
            .ok_or_else(|| LoadError::new(name, "Missing description."))?;
        validate_description(name, "Command", description)?;

        let source = match &command.body {
            CommandBody::Leaf(leaf) => AutocompleteSource::Single(leaf.autocomplete.is_some()),
            CommandBody::Group(group) => {
                if group.is_empty() {
                    return Err(LoadError::new(name, "Command group has no subcommands."));
                }
                AutocompleteSource::Group(group)
            }
        };
        check_options(name, &command.options, source, Level::Top)
    } else {
        if command.description.is_some() {
            return Err(LoadError::new(
                name,
                "Non-chat input commands cannot have a description.",
            ));
        }
        if !command.options.is_empty() || command.is_group() {
            return Err(LoadError::new(
                name,
                "Non-chat input commands cannot have options.",
            ));
        }
        Ok(())
    }
}

/// Validate a standalone option list, as used for per-guild option
/// overrides of a leaf command
pub fn validate_options(
    command_name: &str,
    options: &[CommandOption],
    has_autocomplete_handler: bool,
) -> Result<(), LoadError> {
    check_options(
        command_name,
        options,
        AutocompleteSource::Single(has_autocomplete_handler),
        Level::Top,
    )
}

fn check_options(
    cmd: &str,
    options: &[CommandOption],
    source: AutocompleteSource<'_>,
    level: Level<'_>,
) -> Result<(), LoadError> {
    let Some(first) = options.first() else {
        return Ok(());
    };
    let first_is_subcommand = first.kind.is_subcommand_like();
    let mut seen = HashSet::new();

    for option in options {
        let is_subcommand = option.kind.is_subcommand_like();
        if is_subcommand != first_is_subcommand {
            return Err(LoadError::new(
                cmd,
                "Cannot mix subcommands and subcommand groups with other option types.",
            ));
        }

        check_option_name(cmd, option)?;
        if !seen.insert(option.name.as_str()) {
            return Err(LoadError::new(
                cmd,
                format!("Duplicate option name: {}", option.name),
            ));
        }
        let label = match option.kind {
            OptionType::Subcommand => format!("Subcommand {}", option.name),
            OptionType::SubcommandGroup => format!("Subcommand group {}", option.name),
            _ => format!("Option {}", option.name),
        };
        validate_description(cmd, &label, &option.description)?;

        match (option.kind, level) {
            (OptionType::SubcommandGroup, Level::Top) => {
                if option.options.is_empty() {
                    return Err(LoadError::new(
                        cmd,
                        format!("Subcommand group {} is missing its subcommands.", option.name),
                    ));
                }
                if option.options.iter().any(|o| o.kind != OptionType::Subcommand) {
                    return Err(LoadError::new(
                        cmd,
                        "Subcommand group options can only be subcommands.",
                    ));
                }
                check_options(cmd, &option.options, source, Level::InGroup(&option.name))?;
            }
            (OptionType::Subcommand, Level::Top) => {
                check_options(
                    cmd,
                    &option.options,
                    source,
                    Level::InSubcommand(None, &option.name),
                )?;
            }
            (OptionType::Subcommand, Level::InGroup(group)) => {
                check_options(
                    cmd,
                    &option.options,
                    source,
                    Level::InSubcommand(Some(group), &option.name),
                )?;
            }
            (OptionType::SubcommandGroup, _) => {
                return Err(LoadError::new(
                    cmd,
                    format!(
                        "Cannot have a subcommand group inside another subcommand group (in '{}')",
                        option.name
                    ),
                ));
            }
            (OptionType::Subcommand, Level::InSubcommand(_, parent)) => {
                return Err(LoadError::new(
                    cmd,
                    format!("Subcommand {} cannot contain subcommands.", parent),
                ));
            }
            (_, level) => {
                if !option.options.is_empty() {
                    return Err(LoadError::new(
                        cmd,
                        format!("Option {} cannot have nested options.", option.name),
                    ));
                }
                if option.autocomplete {
                    let (group, subcommand) = match level {
                        Level::InSubcommand(group, sub) => (group, Some(sub)),
                        _ => (None, None),
                    };
                    if !source.has_handler(group, subcommand) {
                        return Err(LoadError::new(
                            cmd,
                            "Command has an autocomplete option, but no autocomplete handler.",
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

fn check_option_name(cmd: &str, option: &CommandOption) -> Result<(), LoadError> {
    let name = option.name.as_str();
    if name.is_empty() {
        return Err(LoadError::new(cmd, "Options must have a name."));
    }
    if !matches_grammar(name) {
        return Err(LoadError::new(cmd, format!("Invalid option name: {}", name)));
    }
    if name != name.to_lowercase() {
        return Err(LoadError::new(
            cmd,
            format!("Option names must be lowercase: {}", name),
        ));
    }
    Ok(())
}
