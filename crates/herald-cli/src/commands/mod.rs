//! CLI command implementations

pub mod check;
pub mod export;
pub mod plan;

use std::sync::Arc;

use herald_core::commands::{CommandBinding, HandlerRegistry, autocomplete_fn, handler_fn};
use herald_core::error::HeraldResult;
use herald_core::sync::GuildCommand;
use herald_core::tree::{CommandTree, CommandTreeBuilder, LoadSettings, LocalFs};
use herald_core::{Command, HeraldConfig};

/// Everything a definition folder produces
pub struct LoadedCommands {
    pub tree: CommandTree,
    pub guild: Vec<GuildCommand>,
    pub owner: Option<Command>,
}

/// Load a folder with no-op run and autocomplete handlers bound to every
/// definition
pub async fn load(config: &HeraldConfig) -> HeraldResult<LoadedCommands> {
    let handlers = HandlerRegistry::new().with_fallback(
        CommandBinding::new(handler_fn(|_| async { Ok(()) }))
            .with_autocomplete(autocomplete_fn(|_| async { Ok(()) })),
    );
    let builder = CommandTreeBuilder::new(Arc::new(LocalFs), config.folder.clone(), handlers)
        .with_settings(LoadSettings::from(config));

    let tree = builder.build().await?;
    let guild = builder.load_guild_commands().await?;
    let owner = match config.owner_server {
        Some(_) => builder.load_owner_command(&config.owner_command).await?,
        None => None,
    };

    Ok(LoadedCommands { tree, guild, owner })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;

    pub fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}
