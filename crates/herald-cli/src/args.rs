//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file name used across all CLI commands.
pub const DEFAULT_CONFIG_FILE: &str = "herald.toml";

#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Herald - load, validate and diff chat-bot command definitions")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (JSON, TOML or YAML)
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate every command definition
    Check {
        /// Definition folder (defaults to the configured folder)
        folder: Option<PathBuf>,

        /// Also load the #debug folder
        #[arg(long)]
        debug: bool,
    },

    /// Print the default-scope payload as JSON
    Export {
        /// Definition folder (defaults to the configured folder)
        folder: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Compare the definitions with a saved remote command list
    Plan {
        /// Definition folder (defaults to the configured folder)
        folder: Option<PathBuf>,

        /// JSON array of remote commands ({id, name, data})
        #[arg(long)]
        remote: PathBuf,

        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan() {
        let cli = Cli::parse_from(["herald", "plan", "cmds", "--remote", "snapshot.json"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        match cli.command {
            Commands::Plan { folder, remote, json } => {
                assert_eq!(folder, Some(PathBuf::from("cmds")));
                assert_eq!(remote, PathBuf::from("snapshot.json"));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_is_global() {
        let cli = Cli::parse_from(["herald", "export", "--pretty", "--config", "bot.yaml"]);
        assert_eq!(cli.config, PathBuf::from("bot.yaml"));
        assert!(matches!(cli.command, Commands::Export { pretty: true, .. }));
    }
}
