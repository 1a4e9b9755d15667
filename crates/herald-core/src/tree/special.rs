//! Guild commands, the owner command, and reloading single commands

use std::sync::Arc;

use tracing::{info, warn};

use super::builder::{CommandTreeBuilder, join_key};
use super::{GUILD_FOLDER, RESERVED_PREFIX};
use crate::commands::{AllScopes, CommandBody, CommandDefinition, LeafBody, Command};
use crate::error::{HeraldError, HeraldResult, LoadError};
use crate::sync::GuildCommand;
use crate::validation::is_valid_name;

/// Description of the owner command unless its `#info` file says otherwise
pub const OWNER_COMMAND_DESCRIPTION: &str = "Execute an owner command";

impl CommandTreeBuilder {
    /// Load the guild-scoped commands of the `#guild` folder
    ///
    /// Each file is a leaf command; its binding's scope policy decides per
    /// guild whether it is installed and with which options.
    pub async fn load_guild_commands(&self) -> HeraldResult<Vec<GuildCommand>> {
        let dir = self.root.join(GUILD_FOLDER);
        if !self.source.is_dir(&dir).await {
            return Ok(Vec::new());
        }

        let mut commands = Vec::new();
        for entry in self.source.read_dir(&dir).await? {
            if entry.is_dir || entry.name.starts_with(RESERVED_PREFIX) {
                continue;
            }
            let Some(name) = self.definition_stem(&entry.name) else {
                continue;
            };

            let key = join_key(GUILD_FOLDER, name);
            let definition = self.read_definition(name, &dir.join(&entry.name)).await?;
            let binding = self.binding(name, &key)?;
            let run = binding
                .run
                .clone()
                .ok_or_else(|| LoadError::new(name, "Missing a 'run' handler."))?;
            let policy = match &binding.scope_policy {
                Some(policy) => policy.clone(),
                None => {
                    warn!(
                        command = %name,
                        "Guild command uses the default scope policy. Maybe it should be registered as a regular command?"
                    );
                    Arc::new(AllScopes)
                }
            };

            let command = Command::from_definition(
                name,
                GUILD_FOLDER,
                definition,
                CommandBody::Leaf(LeafBody {
                    run,
                    autocomplete: binding.autocomplete.clone(),
                }),
                self.settings.default_dm_permission,
            );
            let command = self.finish(command)?;
            commands.push(GuildCommand::new(command, policy));
        }

        info!(commands = commands.len(), "Loaded guild commands");
        Ok(commands)
    }

    /// Load the owner folder as a single group command
    ///
    /// Returns `None` when the folder does not exist.
    pub async fn load_owner_command(&self, folder: &str) -> HeraldResult<Option<Command>> {
        if !is_valid_name(folder) {
            return Err(HeraldError::config(format!(
                "Owner subfolder must have a valid command name; got '{}'",
                folder
            )));
        }

        let dir = self.root.join(folder);
        if !self.source.exists(&dir).await {
            return Ok(None);
        }
        if !self.source.is_dir(&dir).await {
            return Err(HeraldError::config(
                "Owner command must not be a file but a subfolder with subcommand files.",
            ));
        }

        let defaults = CommandDefinition::chat_input(OWNER_COMMAND_DESCRIPTION)
            .with_default_member_permissions("0");
        let command = self.load_group(folder, &dir, Some(defaults)).await?;
        Ok(Some(command))
    }

    /// Load one command again from its definition
    ///
    /// In folders-as-groups mode a top-level folder named `name` is loaded as
    /// a group; otherwise the definition file is looked up in `subfolder`.
    pub async fn reload_command(&self, name: &str, subfolder: &str) -> HeraldResult<Command> {
        let dir = self.root.join(name);
        if self.settings.folders_as_groups
            && subfolder.is_empty()
            && self.source.is_dir(&dir).await
        {
            return self.load_group(name, &dir, None).await;
        }

        let base = self.root.join(subfolder);
        for extension in &self.settings.extensions {
            let file = base.join(format!("{}.{}", name, extension.trim_start_matches('.')));
            if self.source.exists(&file).await {
                return self.load_leaf(name, subfolder, &file).await;
            }
        }

        Err(LoadError::new(
            name,
            format!("No definition file found in subfolder \"{}\".", subfolder),
        )
        .into())
    }
}
