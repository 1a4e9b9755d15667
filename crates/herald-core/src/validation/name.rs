//! Name and description rules

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LoadError;

/// Grammar every command, subcommand and option name must match
pub const NAME_PATTERN: &str = r"^[-_\p{L}\p{N}\p{Devanagari}\p{Thai}]{1,32}$";

pub const MAX_NAME_LENGTH: usize = 32;
pub const MIN_DESCRIPTION_LENGTH: usize = 4;
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"));

/// Whether `name` passes the grammar, length and case rules
pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() <= MAX_NAME_LENGTH && NAME_REGEX.is_match(name) && is_lowercase(name)
}

/// Check a command-level name, reporting violations against `command_name`
pub fn validate_name(command_name: &str, name: &str) -> Result<(), LoadError> {
    let length = name.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(LoadError::new(
            command_name,
            format!("Command name too long ({}/{})", length, MAX_NAME_LENGTH),
        ));
    }
    if !NAME_REGEX.is_match(name) {
        return Err(LoadError::new(command_name, "Invalid command name."));
    }
    if !is_lowercase(name) {
        return Err(LoadError::new(
            command_name,
            "Command names must be lowercase.",
        ));
    }
    Ok(())
}

/// Check a description's length. `label` names what is being described.
pub(super) fn validate_description(
    command_name: &str,
    label: &str,
    description: &str,
) -> Result<(), LoadError> {
    let length = description.chars().count();
    if length == 0 {
        return Err(LoadError::new(
            command_name,
            format!("{} is missing a description.", label),
        ));
    }
    if length < MIN_DESCRIPTION_LENGTH {
        return Err(LoadError::new(
            command_name,
            format!("{}'s description is too short.", label),
        ));
    }
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(LoadError::new(
            command_name,
            format!(
                "{}'s description is too long ({}/{}).",
                label, length, MAX_DESCRIPTION_LENGTH
            ),
        ));
    }
    Ok(())
}

pub(super) fn matches_grammar(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

fn is_lowercase(name: &str) -> bool {
    name == name.to_lowercase()
}
