//! Tests for command validation

use super::*;
use crate::commands::{
    Command, CommandBody, CommandDefinition, CommandGroup, CommandKind, CommandOption, LeafBody,
    OptionType, Subcommand, SubcommandGroup, autocomplete_fn, handler_fn,
};

fn leaf(name: &str, description: &str, options: Vec<CommandOption>, autocomplete: bool) -> Command {
    Command::from_definition(
        name,
        "",
        CommandDefinition::chat_input(description).with_options(options),
        CommandBody::Leaf(LeafBody {
            run: handler_fn(|_| async { Ok(()) }),
            autocomplete: autocomplete.then(|| autocomplete_fn(|_| async { Ok(()) })),
        }),
        false,
    )
}

fn subcommand(name: &str, options: Vec<CommandOption>, autocomplete: bool) -> Subcommand {
    Subcommand {
        name: name.to_string(),
        description: format!("The {} subcommand", name),
        options,
        run: handler_fn(|_| async { Ok(()) }),
        autocomplete: autocomplete.then(|| autocomplete_fn(|_| async { Ok(()) })),
    }
}

fn value(name: &str) -> CommandOption {
    CommandOption::new(name, "A value option", OptionType::String)
}

#[test]
fn test_valid_names_accepted() {
    let longest = "a".repeat(32);
    for name in ["ping", "a", "set-role", "snake_case", "año", "नमस्ते", "สวัสดี", "x1", longest.as_str()] {
        assert!(is_valid_name(name), "{} should be valid", name);
        assert!(validate_command(&leaf(name, "A valid description", vec![], false)).is_ok());
    }
}

#[test]
fn test_invalid_names_rejected_with_command_name() {
    let too_long = "a".repeat(33);
    for name in [too_long.as_str(), "", "has space", "dot.name", "Ping", "ÜBER", "emoji🎉"] {
        let err = validate_command(&leaf(name, "A valid description", vec![], false))
            .expect_err(name);
        assert_eq!(err.command_name, name);
        assert!(!is_valid_name(name));
    }
}

#[test]
fn test_name_error_messages() {
    let err = validate_name("x", &"a".repeat(33)).unwrap_err();
    assert_eq!(err.message, "Command name too long (33/32)");

    let err = validate_name("Ping", "Ping").unwrap_err();
    assert_eq!(err.message, "Command names must be lowercase.");

    let err = validate_name("a b", "a b").unwrap_err();
    assert_eq!(err.message, "Invalid command name.");
}

#[test]
fn test_description_length_boundaries() {
    assert!(validate_command(&leaf("ping", &"d".repeat(3), vec![], false)).is_err());
    assert!(validate_command(&leaf("ping", &"d".repeat(4), vec![], false)).is_ok());
    assert!(validate_command(&leaf("ping", &"d".repeat(100), vec![], false)).is_ok());
    let err = validate_command(&leaf("ping", &"d".repeat(101), vec![], false)).unwrap_err();
    assert!(err.message.contains("101/100"));
}

#[test]
fn test_missing_description() {
    let mut cmd = leaf("ping", "Replies with pong", vec![], false);
    cmd.description = None;
    let err = validate_command(&cmd).unwrap_err();
    assert_eq!(err.message, "Missing description.");
}

#[test]
fn test_context_menu_rules() {
    let mut cmd = leaf("quote", "unused", vec![], false);
    cmd.kind = CommandKind::MessageContextMenu;
    let err = validate_command(&cmd).unwrap_err();
    assert_eq!(err.message, "Non-chat input commands cannot have a description.");

    cmd.description = None;
    assert!(validate_command(&cmd).is_ok());

    cmd.options = vec![value("text")];
    let err = validate_command(&cmd).unwrap_err();
    assert_eq!(err.message, "Non-chat input commands cannot have options.");
}

#[test]
fn test_mixing_subcommands_and_values_fails() {
    let options = vec![CommandOption::subcommand("list", "List things"), value("query")];
    let err = validate_command(&leaf("thing", "Manage things", options, false)).unwrap_err();
    assert!(err.message.contains("Cannot mix"));

    let options = vec![value("query"), CommandOption::subcommand("list", "List things")];
    assert!(validate_command(&leaf("thing", "Manage things", options, false)).is_err());
}

#[test]
fn test_homogeneous_option_lists_pass() {
    let subs = vec![
        CommandOption::subcommand("list", "List things"),
        CommandOption::subcommand("add", "Add a thing").with_options(vec![value("name").required()]),
    ];
    assert!(validate_command(&leaf("thing", "Manage things", subs, false)).is_ok());

    let values = vec![value("query").required(), value("limit")];
    assert!(validate_command(&leaf("search", "Search things", values, false)).is_ok());
}

#[test]
fn test_subcommand_group_children() {
    let empty = vec![CommandOption::subcommand_group("role", "Manage roles")];
    let err = validate_command(&leaf("admin", "Admin tools", empty, false)).unwrap_err();
    assert_eq!(err.message, "Subcommand group role is missing its subcommands.");

    let good = vec![CommandOption::subcommand_group("role", "Manage roles")
        .with_options(vec![CommandOption::subcommand("add", "Add a role")])];
    assert!(validate_command(&leaf("admin", "Admin tools", good, false)).is_ok());

    let bad = vec![CommandOption::subcommand_group("role", "Manage roles")
        .with_options(vec![value("name")])];
    let err = validate_command(&leaf("admin", "Admin tools", bad, false)).unwrap_err();
    assert_eq!(err.message, "Subcommand group options can only be subcommands.");
}

#[test]
fn test_nesting_depth_is_bounded() {
    let nested_group = vec![CommandOption::subcommand_group("outer", "Outer group").with_options(vec![
        CommandOption::subcommand("inner", "Inner subcommand")
            .with_options(vec![CommandOption::subcommand("deeper", "Too deep")]),
    ])];
    assert!(validate_command(&leaf("admin", "Admin tools", nested_group, false)).is_err());

    let sub_in_sub = vec![CommandOption::subcommand("outer", "Outer sub")
        .with_options(vec![CommandOption::subcommand("inner", "Inner sub")])];
    let err = validate_command(&leaf("admin", "Admin tools", sub_in_sub, false)).unwrap_err();
    assert_eq!(err.message, "Subcommand outer cannot contain subcommands.");
}

#[test]
fn test_option_name_and_description_rules() {
    let err = validate_command(&leaf("cmd", "A command", vec![value("")], false)).unwrap_err();
    assert_eq!(err.message, "Options must have a name.");

    let err = validate_command(&leaf("cmd", "A command", vec![value("bad name")], false)).unwrap_err();
    assert_eq!(err.message, "Invalid option name: bad name");

    let err = validate_command(&leaf("cmd", "A command", vec![value("Upper")], false)).unwrap_err();
    assert!(err.message.contains("lowercase"));

    let short = CommandOption::new("query", "abc", OptionType::String);
    let err = validate_command(&leaf("cmd", "A command", vec![short], false)).unwrap_err();
    assert_eq!(err.message, "Option query's description is too short.");

    let missing = CommandOption::new("query", "", OptionType::String);
    let err = validate_command(&leaf("cmd", "A command", vec![missing], false)).unwrap_err();
    assert_eq!(err.message, "Option query is missing a description.");

    let err = validate_command(&leaf("cmd", "A command", vec![value("q"), value("q")], false))
        .unwrap_err();
    assert_eq!(err.message, "Duplicate option name: q");
}

#[test]
fn test_autocomplete_requires_handler() {
    let options = vec![value("query").with_autocomplete()];
    let err = validate_command(&leaf("search", "Search things", options.clone(), false)).unwrap_err();
    assert!(err.message.contains("no autocomplete handler"));
    assert!(validate_command(&leaf("search", "Search things", options, true)).is_ok());
}

fn group_command(group: CommandGroup) -> Command {
    Command::from_definition(
        "admin",
        "",
        CommandDefinition::chat_input("/admin"),
        CommandBody::Group(group),
        false,
    )
}

#[test]
fn test_group_autocomplete_uses_subcommand_handler() {
    let mut group = CommandGroup::new();
    group.subcommands.insert(
        "find".into(),
        subcommand("find", vec![value("user").with_autocomplete()], true),
    );
    assert!(validate_command(&group_command(group)).is_ok());

    let mut group = CommandGroup::new();
    group.subcommands.insert(
        "find".into(),
        subcommand("find", vec![value("user").with_autocomplete()], false),
    );
    let err = validate_command(&group_command(group)).unwrap_err();
    assert_eq!(err.command_name, "admin");
}

#[test]
fn test_group_with_nested_subcommand_group() {
    let mut group = CommandGroup::new();
    let mut role = SubcommandGroup {
        name: "role".into(),
        description: "Manage roles".into(),
        subcommands: Default::default(),
    };
    role.subcommands.insert(
        "grant".into(),
        subcommand("grant", vec![value("role").with_autocomplete()], true),
    );
    group.subcommand_groups.insert("role".into(), role);
    assert!(validate_command(&group_command(group)).is_ok());
}

#[test]
fn test_empty_group_rejected() {
    let err = validate_command(&group_command(CommandGroup::new())).unwrap_err();
    assert_eq!(err.message, "Command group has no subcommands.");
}

#[test]
fn test_validate_options_override() {
    assert!(validate_options("poll", &[value("choice")], false).is_ok());
    assert!(validate_options("poll", &[value("choice").with_autocomplete()], false).is_err());
    assert!(validate_options("poll", &[value("choice").with_autocomplete()], true).is_ok());
}
