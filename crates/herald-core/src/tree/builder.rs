//! Command tree builder

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::discovery::LoadUnit;
use super::middleware::{Middleware, MiddlewareChain};
use super::source::{DefinitionSource, parse_definition};
use super::{CommandTree, GUILD_FOLDER};
use crate::commands::{
    Command, CommandBinding, CommandBody, CommandDefinition, HandlerRegistry, LeafBody,
};
use crate::config::HeraldConfig;
use crate::error::{HeraldResult, LoadError};
use crate::validation::validate_command;

/// How the loader interprets the directory layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSettings {
    /// Top-level folders become group commands
    pub folders_as_groups: bool,
    /// Load the `#debug` folder
    pub debug: bool,
    /// `dm_permission` of commands that don't set it
    pub default_dm_permission: bool,
    /// Accepted definition file extensions
    pub extensions: Vec<String>,
    /// Top-level names the main pass skips
    pub special_folders: Vec<String>,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            folders_as_groups: true,
            debug: false,
            default_dm_permission: false,
            extensions: ["toml", "json", "yaml", "yml"]
                .into_iter()
                .map(String::from)
                .collect(),
            special_folders: vec![GUILD_FOLDER.to_string()],
        }
    }
}

impl From<&HeraldConfig> for LoadSettings {
    fn from(config: &HeraldConfig) -> Self {
        let mut special_folders = vec![GUILD_FOLDER.to_string()];
        if config.owner_server.is_some() {
            special_folders.push(config.owner_command.clone());
        }

        Self {
            folders_as_groups: config.folders_as_groups,
            debug: config.debug,
            default_dm_permission: config.default_dm_permission,
            extensions: config.command_file_extensions.clone(),
            special_folders,
        }
    }
}

/// Loads definition files from a root directory into a [`CommandTree`]
#[derive(Clone)]
pub struct CommandTreeBuilder {
    pub(super) source: Arc<dyn DefinitionSource>,
    pub(super) root: PathBuf,
    pub(super) settings: LoadSettings,
    pub(super) handlers: HandlerRegistry,
    pub(super) middleware: MiddlewareChain,
}

impl CommandTreeBuilder {
    /// Create a builder reading from `root`
    pub fn new(
        source: Arc<dyn DefinitionSource>,
        root: impl Into<PathBuf>,
        handlers: HandlerRegistry,
    ) -> Self {
        Self {
            source,
            root: root.into(),
            settings: LoadSettings::default(),
            handlers,
            middleware: MiddlewareChain::new(),
        }
    }

    /// Set load settings
    pub fn with_settings(mut self, settings: LoadSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a middleware stage
    pub fn with_middleware(mut self, stage: impl Middleware + 'static) -> Self {
        self.middleware.push(stage);
        self
    }

    /// Replace the whole middleware pipeline
    pub fn with_middleware_chain(mut self, chain: MiddlewareChain) -> Self {
        self.middleware = chain;
        self
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load settings
    pub fn settings(&self) -> &LoadSettings {
        &self.settings
    }

    /// Load every command under the root
    ///
    /// Independent units load concurrently; insertion happens afterwards in
    /// directory order, so a duplicate name always fails on the same unit.
    pub async fn build(&self) -> HeraldResult<CommandTree> {
        let units = self.discover(&self.root, "").await?;
        debug!(units = units.len(), root = %self.root.display(), "Discovered load units");

        let commands = try_join_all(units.iter().map(|unit| self.load_unit(unit))).await?;

        let mut tree = CommandTree::new();
        for command in commands {
            tree.insert(command)?;
        }

        info!(commands = tree.len(), "Loaded command tree");
        Ok(tree)
    }

    pub(super) async fn load_unit(&self, unit: &LoadUnit) -> HeraldResult<Command> {
        match unit {
            LoadUnit::Leaf {
                name,
                subfolder,
                file,
            } => self.load_leaf(name, subfolder, file).await,
            LoadUnit::Group { name, dir } => self.load_group(name, dir, None).await,
        }
    }

    /// Load a single file as a top-level leaf command
    pub(super) async fn load_leaf(
        &self,
        name: &str,
        subfolder: &str,
        file: &Path,
    ) -> HeraldResult<Command> {
        let definition = self.read_definition(name, file).await?;
        let binding = self.binding(name, &join_key(subfolder, name))?;
        let run = binding.run.clone().ok_or_else(|| {
            LoadError::new(name, "Missing a 'run' handler.")
        })?;

        let command = Command::from_definition(
            name,
            subfolder,
            definition,
            CommandBody::Leaf(LeafBody {
                run,
                autocomplete: binding.autocomplete.clone(),
            }),
            self.settings.default_dm_permission,
        );
        Ok(self.finish(command)?)
    }

    /// Parse a definition file, reporting failures against `command_name`
    pub(super) async fn read_definition(
        &self,
        command_name: &str,
        file: &Path,
    ) -> HeraldResult<CommandDefinition> {
        let content = self.source.read_to_string(file).await?;
        parse_definition(file, &content).map_err(|e| {
            LoadError::new(
                command_name,
                format!("Invalid definition file {}: {}", file.display(), e),
            )
            .into()
        })
    }

    /// Binding for a path key. A missing binding is reported against
    /// `command_name`.
    pub(super) fn binding(&self, command_name: &str, key: &str) -> Result<&CommandBinding, LoadError> {
        self.handlers.get(key).ok_or_else(|| {
            LoadError::new(
                command_name,
                format!("No handler is bound for '{}'.", key),
            )
        })
    }

    /// Run middleware, freeze name and subfolder, then validate
    pub(super) fn finish(&self, command: Command) -> Result<Command, LoadError> {
        let name = command.name.clone();
        let subfolder = command.subfolder.clone();

        let mut command = self.middleware.apply(command);
        if command.name != name {
            warn!(
                command = %name,
                renamed_to = %command.name,
                "Middleware cannot rename commands; keeping the original name"
            );
            command.name = name;
        }
        command.subfolder = subfolder;
        if let CommandBody::Group(group) = &command.body {
            command.options = group.to_options();
        }

        validate_command(&command)?;
        Ok(command)
    }

    /// Whether a file name has an accepted extension; returns the stem
    pub(super) fn definition_stem<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let (stem, extension) = file_name.rsplit_once('.')?;
        self.settings
            .extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.') == extension)
            .then_some(stem)
    }
}

/// Handler registry key of a unit
pub(super) fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}
