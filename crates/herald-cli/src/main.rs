//! Herald CLI
//!
//! Offline tooling for a folder of command definitions:
//!
//! - `herald check [FOLDER]` loads and validates every definition
//! - `herald export [FOLDER]` prints the payload the default scope receives
//! - `herald plan [FOLDER] --remote SNAPSHOT.json` shows what a sync would
//!   change against a saved remote command list
//!
//! Handlers are code, so the CLI binds a no-op handler to every definition.

mod args;
mod commands;
mod router;

use clap::Parser;
use herald_core::config::{ConfigLoader, LoggingConfig};
use tracing_subscriber::EnvFilter;

pub use args::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::new().with_file(&cli.config).with_env().load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
    };
    init_logging(&config.logging);

    if let Err(err) = router::route(cli, config).await {
        tracing::debug!(code = err.error_code(), "Command failed");
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_lowercase()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        "compact" => builder.compact().init(),
        _ => builder.init(),
    }
}
