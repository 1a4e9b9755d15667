//! Folders as group commands

use std::path::Path;

use futures::future::try_join_all;

use super::builder::{CommandTreeBuilder, join_key};
use super::{INFO_FILE_STEM, RESERVED_PREFIX};
use crate::commands::{
    Command, CommandBody, CommandDefinition, CommandGroup, CommandKind, Subcommand,
    SubcommandGroup,
};
use crate::error::{HeraldResult, LoadError};

impl CommandTreeBuilder {
    /// Load a folder as a group command
    ///
    /// Files become subcommands, subfolders become subcommand groups. An
    /// optional `#info` file supplies the description and permissions;
    /// `defaults` fills whatever the info file leaves unset.
    pub(super) async fn load_group(
        &self,
        name: &str,
        dir: &Path,
        defaults: Option<CommandDefinition>,
    ) -> HeraldResult<Command> {
        let mut definition = self
            .read_info(name, dir)
            .await?
            .unwrap_or_default();
        let defaults =
            defaults.unwrap_or_else(|| CommandDefinition::chat_input(format!("/{}", name)));
        if definition.description.is_none() {
            definition.description = defaults.description;
        }
        if definition.default_member_permissions.is_none() {
            definition.default_member_permissions = defaults.default_member_permissions;
        }
        check_group_info(name, &definition)?;

        let entries = self.source.read_dir(dir).await?;
        let mut group = CommandGroup::new();
        let mut sub_groups = Vec::new();

        for entry in entries.iter().filter(|e| !e.name.starts_with(RESERVED_PREFIX)) {
            let path = dir.join(&entry.name);
            if entry.is_dir {
                sub_groups.push(async move {
                    self.load_subcommand_group(name, &entry.name, &path).await
                });
            } else if let Some(stem) = self.definition_stem(&entry.name) {
                let key = join_key(name, stem);
                let subcommand = self.load_subcommand(name, stem, &key, &path).await?;
                if group.subcommands.insert(stem.to_string(), subcommand).is_some() {
                    return Err(LoadError::new(
                        name,
                        format!("Subcommand {} is defined more than once.", stem),
                    )
                    .into());
                }
            }
        }

        for sub_group in try_join_all(sub_groups).await? {
            if group.subcommands.contains_key(&sub_group.name) {
                return Err(LoadError::new(
                    name,
                    format!(
                        "'{}' is both a subcommand and a subcommand group.",
                        sub_group.name
                    ),
                )
                .into());
            }
            group.subcommand_groups.insert(sub_group.name.clone(), sub_group);
        }

        let command = Command::from_definition(
            name,
            "",
            definition,
            CommandBody::Group(group),
            self.settings.default_dm_permission,
        );
        Ok(self.finish(command)?)
    }

    async fn load_subcommand_group(
        &self,
        parent: &str,
        group_name: &str,
        dir: &Path,
    ) -> HeraldResult<SubcommandGroup> {
        let info = self.read_info(parent, dir).await?.unwrap_or_default();
        let description = info
            .description
            .unwrap_or_else(|| format!("/{} {}", parent, group_name));

        let mut subcommands = std::collections::BTreeMap::new();
        for entry in self.source.read_dir(dir).await? {
            if entry.name.starts_with(RESERVED_PREFIX) {
                continue;
            }
            if entry.is_dir {
                return Err(LoadError::new(
                    parent,
                    format!(
                        "Cannot have a subcommand group inside another subcommand group (in '{}')",
                        group_name
                    ),
                )
                .into());
            }
            let Some(stem) = self.definition_stem(&entry.name) else {
                continue;
            };
            let key = join_key(&join_key(parent, group_name), stem);
            let subcommand = self
                .load_subcommand(parent, stem, &key, &dir.join(&entry.name))
                .await?;
            if subcommands.insert(stem.to_string(), subcommand).is_some() {
                return Err(LoadError::new(
                    parent,
                    format!("Subcommand {} {} is defined more than once.", group_name, stem),
                )
                .into());
            }
        }

        Ok(SubcommandGroup {
            name: group_name.to_string(),
            description,
            subcommands,
        })
    }

    async fn load_subcommand(
        &self,
        parent: &str,
        name: &str,
        key: &str,
        file: &Path,
    ) -> HeraldResult<Subcommand> {
        let definition = self.read_definition(parent, file).await?;
        if definition
            .kind
            .is_some_and(|kind| kind != CommandKind::ChatInput)
        {
            return Err(LoadError::new(
                parent,
                format!("Subcommand {} must be a chat input command.", name),
            )
            .into());
        }
        if definition.default_member_permissions.is_some()
            || definition.dm_permission.is_some()
            || definition.nsfw
        {
            return Err(LoadError::new(
                parent,
                format!(
                    "Subcommand {} cannot set permissions or nsfw; set them in the group's info file.",
                    name
                ),
            )
            .into());
        }

        let binding = self.binding(parent, key)?;
        let run = binding.run.clone().ok_or_else(|| {
            LoadError::new(
                parent,
                format!("Subcommand {} is missing a 'run' handler.", key),
            )
        })?;

        Ok(Subcommand {
            name: name.to_string(),
            description: definition.description.unwrap_or_default(),
            options: definition.options.unwrap_or_default(),
            run,
            autocomplete: binding.autocomplete.clone(),
        })
    }

    /// Read the `#info` file of a folder, if there is one
    async fn read_info(
        &self,
        command_name: &str,
        dir: &Path,
    ) -> HeraldResult<Option<CommandDefinition>> {
        for extension in &self.settings.extensions {
            let path = dir.join(format!(
                "{}.{}",
                INFO_FILE_STEM,
                extension.trim_start_matches('.')
            ));
            if self.source.exists(&path).await {
                return self.read_definition(command_name, &path).await.map(Some);
            }
        }
        Ok(None)
    }
}

fn check_group_info(name: &str, info: &CommandDefinition) -> Result<(), LoadError> {
    if info.kind.is_some_and(|kind| kind != CommandKind::ChatInput) {
        return Err(LoadError::new(
            name,
            "Group commands must be chat input commands.",
        ));
    }
    if info.options.as_ref().is_some_and(|options| !options.is_empty()) {
        return Err(LoadError::new(
            name,
            "Group options come from the folder; the info file cannot declare options.",
        ));
    }
    Ok(())
}
