//! Command routing

use herald_core::HeraldConfig;
use herald_core::error::HeraldResult;

use crate::args::{Cli, Commands};
use crate::commands;

/// Route CLI command to appropriate handler
pub async fn route(cli: Cli, mut config: HeraldConfig) -> HeraldResult<()> {
    match cli.command {
        Commands::Check { folder, debug } => {
            config.debug |= debug;
            commands::check::execute(&with_folder(config, folder)).await
        }
        Commands::Export { folder, pretty } => {
            commands::export::execute(&with_folder(config, folder), pretty).await
        }
        Commands::Plan {
            folder,
            remote,
            json,
        } => commands::plan::execute(&with_folder(config, folder), &remote, json).await,
    }
}

fn with_folder(mut config: HeraldConfig, folder: Option<std::path::PathBuf>) -> HeraldConfig {
    if let Some(folder) = folder {
        config.folder = folder;
    }
    config
}
