//! Check command implementation

use herald_core::commands::{Command, CommandBody};
use herald_core::error::HeraldResult;
use herald_core::HeraldConfig;

use super::{LoadedCommands, load};

/// Load the folder and list what was found
pub async fn execute(config: &HeraldConfig) -> HeraldResult<()> {
    let loaded = load(config).await?;
    for line in summarize(&loaded) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per command, subcommands indented below their group
pub fn summarize(loaded: &LoadedCommands) -> Vec<String> {
    let mut lines = Vec::new();
    for command in loaded.tree.iter() {
        describe(&mut lines, command, "");
    }
    for command in &loaded.guild {
        describe(&mut lines, command.command(), " (guild)");
    }
    if let Some(owner) = &loaded.owner {
        describe(&mut lines, owner, " (owner)");
    }

    lines.push(format!(
        "{} commands, {} guild commands{}",
        loaded.tree.len(),
        loaded.guild.len(),
        if loaded.owner.is_some() { ", owner command" } else { "" }
    ));
    lines
}

fn describe(lines: &mut Vec<String>, command: &Command, suffix: &str) {
    let location = if command.subfolder.is_empty() {
        String::new()
    } else {
        format!(" [{}]", command.subfolder)
    };
    lines.push(format!(
        "/{} {:?}{}{}",
        command.name, command.kind, location, suffix
    ));

    if let CommandBody::Group(group) = &command.body {
        for name in group.subcommands.keys() {
            lines.push(format!("  {}", name));
        }
        for (name, sub_group) in &group.subcommand_groups {
            for sub in sub_group.subcommands.keys() {
                lines.push(format!("  {} {}", name, sub));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write;
    use herald_core::GuildId;
    use tempfile::TempDir;

    fn config(root: &std::path::Path) -> HeraldConfig {
        HeraldConfig {
            folder: root.to_path_buf(),
            ..HeraldConfig::default()
        }
    }

    #[tokio::test]
    async fn test_summary_lists_groups_and_guild_commands() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "ping.toml", "description = \"Replies with pong\"\n");
        write(temp.path(), "admin/kick.toml", "description = \"Kick a member\"\n");
        write(temp.path(), "admin/role/add.toml", "description = \"Add a role\"\n");
        write(temp.path(), "#guild/vote.toml", "description = \"Vote on something\"\n");

        let loaded = load(&config(temp.path())).await.unwrap();
        let lines = summarize(&loaded);
        assert_eq!(
            lines,
            vec![
                "/admin ChatInput",
                "  kick",
                "  role add",
                "/ping ChatInput",
                "/vote ChatInput [#guild] (guild)",
                "2 commands, 1 guild commands",
            ]
        );
    }

    #[tokio::test]
    async fn test_owner_folder_is_reported_separately() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "owner/restart.toml", "description = \"Restart the bot\"\n");

        let mut config = config(temp.path());
        config.owner_server = Some(GuildId(1));
        let loaded = load(&config).await.unwrap();
        assert!(loaded.tree.is_empty());
        assert!(summarize(&loaded).contains(&"/owner ChatInput (owner)".to_string()));
    }

    #[tokio::test]
    async fn test_autocomplete_options_load() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "search.toml",
            r#"description = "Search the docs"

[[options]]
name = "query"
description = "What to look for"
type = "string"
autocomplete = true
"#,
        );
        write(
            temp.path(),
            "admin/find.toml",
            r#"description = "Find a member"

[[options]]
name = "member"
description = "Who to look for"
type = "string"
autocomplete = true
"#,
        );

        let loaded = load(&config(temp.path())).await.unwrap();
        assert_eq!(loaded.tree.names(), vec!["admin", "search"]);
        assert!(execute(&config(temp.path())).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_definition_fails() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Ping.toml", "description = \"Replies with pong\"\n");

        let err = execute(&config(temp.path())).await.unwrap_err();
        assert_eq!(err.error_code(), "HERALD_LOAD");
    }
}
