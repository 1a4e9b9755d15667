//! Startup wiring
//!
//! [`Herald`] owns the loaded tree, the scope registry and the router, and
//! exposes the lifecycle hooks a bot's event loop calls: `start` once the
//! connection is ready, `on_guild_create` / `on_guild_delete` as guilds come
//! and go, and `handle` for every interaction.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use tracing::info;

use crate::commands::{Command, GuildId, HandlerRegistry, Scope, ScopeFilter};
use crate::config::HeraldConfig;
use crate::error::{HeraldError, HeraldResult, LoadError};
use crate::interaction::InteractionEvent;
use crate::remote::RemoteRegistry;
use crate::router::{InteractionRouter, RouteOutcome};
use crate::sync::{GuildCommand, ReconcileReport, ScopeRegistry, Synchronizer};
use crate::tree::{CommandTree, CommandTreeBuilder, LoadSettings, LocalFs};

/// A loaded command set bound to a remote registry
pub struct Herald {
    config: HeraldConfig,
    builder: CommandTreeBuilder,
    tree: Arc<RwLock<CommandTree>>,
    sync: Synchronizer,
    router: InteractionRouter,
    /// Scope the main tree is pushed to; `None` until the first guild
    /// appears in debug mode without a configured server
    main_scope: Mutex<Option<Scope>>,
    owner: Option<(String, GuildId)>,
}

impl Herald {
    /// Load from the configured folder on the local file system
    pub async fn load(
        config: HeraldConfig,
        handlers: HandlerRegistry,
        remote: Arc<dyn RemoteRegistry>,
    ) -> HeraldResult<Self> {
        let builder = CommandTreeBuilder::new(Arc::new(LocalFs), config.folder.clone(), handlers)
            .with_settings(LoadSettings::from(&config));
        Self::from_builder(config, builder, remote).await
    }

    /// Load with a prepared builder (custom source or middleware)
    pub async fn from_builder(
        config: HeraldConfig,
        builder: CommandTreeBuilder,
        remote: Arc<dyn RemoteRegistry>,
    ) -> HeraldResult<Self> {
        config.validate()?;

        let mut tree = builder.build().await?;
        let mut guild_commands = builder.load_guild_commands().await?;
        let single = config.effective_single_server(None);

        let mut owner = None;
        if let Some(owner_guild) = config.owner_server {
            if let Some(command) = builder.load_owner_command(&config.owner_command).await? {
                if single == Some(owner_guild) {
                    tree.insert(command)?;
                } else {
                    owner = Some((command.name.clone(), owner_guild));
                    let policy = Arc::new(ScopeFilter::new(move |guild| guild == owner_guild));
                    guild_commands.push(GuildCommand::new(command, policy));
                }
            }
        }

        for command in &guild_commands {
            if let Some(existing) = tree.get(command.name()) {
                return Err(LoadError::new(
                    command.name(),
                    format!(
                        "Can't load guild command {}, it already exists in subfolder \"{}\"",
                        command.name(),
                        existing.subfolder
                    ),
                )
                .into());
            }
        }
        let registry = ScopeRegistry::from_commands(guild_commands)?;

        let main_scope = match single {
            Some(guild) => Some(Scope::Guild(guild)),
            None if config.debug => None,
            None => Some(Scope::Default),
        };
        let mut sync = Synchronizer::new(remote, registry);
        if let Some(scope) = main_scope {
            sync = sync.with_default_scope(scope);
        }

        let tree = Arc::new(RwLock::new(tree));
        let router = InteractionRouter::new(Arc::clone(&tree)).with_guild_commands(sync.registry());

        info!(
            commands = tree.read().len(),
            guild_commands = sync.registry().read().len(),
            "Herald loaded"
        );

        Ok(Self {
            config,
            builder,
            tree,
            sync,
            router,
            main_scope: Mutex::new(main_scope),
            owner,
        })
    }

    /// Push the main tree and install the owner command
    pub async fn start(&self) -> HeraldResult<()> {
        let scope = *self.main_scope.lock();
        match scope {
            Some(scope) => {
                let data = self.tree.read().data();
                self.sync.push_all(scope, &data).await?;
            }
            None => info!("Debug mode without a server; commands are pushed to the first guild"),
        }

        if let Some((name, guild)) = &self.owner {
            self.sync.update(name, *guild, true).await?;
        }
        Ok(())
    }

    /// A guild became available
    pub async fn on_guild_create(&self, guild: GuildId) -> HeraldResult<ReconcileReport> {
        let claimed = {
            let mut scope = self.main_scope.lock();
            if scope.is_none() {
                *scope = Some(Scope::Guild(guild));
                true
            } else {
                false
            }
        };
        if claimed {
            let data = self.tree.read().data();
            if let Err(err) = self.sync.push_all(Scope::Guild(guild), &data).await {
                // Let the next guild try again
                *self.main_scope.lock() = None;
                return Err(err);
            }
        }

        self.sync.reconcile_on_scope_appear(guild).await
    }

    /// The bot left a guild
    pub fn on_guild_delete(&self, guild: GuildId) -> usize {
        self.sync.reconcile_on_scope_remove(guild)
    }

    /// Route an interaction
    pub async fn handle(&self, event: &InteractionEvent) -> RouteOutcome {
        self.router.dispatch(event).await
    }

    /// Load a command again and push its new definition
    ///
    /// The owner command is re-read from the owner folder and edited in the
    /// owner guild, or in the main scope when it is part of the main tree.
    pub async fn reload(&self, name: &str) -> HeraldResult<()> {
        if self.is_owner_command(name) {
            return self.reload_owner().await;
        }

        let subfolder = self
            .tree
            .read()
            .get(name)
            .map(|c| c.subfolder.clone())
            .ok_or_else(|| HeraldError::other(format!("Unknown command '{}'", name)))?;

        let command = self.builder.reload_command(name, &subfolder).await?;
        self.replace_in_tree(command).await
    }

    /// Load the owner folder again and push the owner command
    pub async fn reload_owner(&self) -> HeraldResult<()> {
        let folder = &self.config.owner_command;
        if self.config.owner_server.is_none() {
            return Err(HeraldError::config("No owner server is configured"));
        }
        let command = self
            .builder
            .load_owner_command(folder)
            .await?
            .ok_or_else(|| HeraldError::other(format!("Owner folder '{}' does not exist", folder)))?;

        let in_tree = self.tree.read().contains(&command.name);
        match &self.owner {
            Some((name, guild)) => {
                let previous = self.sync.registry().write().replace(command);
                if previous.is_none() {
                    return Err(HeraldError::other(format!("Unknown guild command '{}'", name)));
                }
                info!(command = %name, guild = %guild, "Reloaded owner command");
                self.sync.update(name, *guild, true).await?;
                Ok(())
            }
            None if in_tree => self.replace_in_tree(command).await,
            None => Err(HeraldError::other(format!(
                "Owner command '{}' was not loaded at startup",
                command.name
            ))),
        }
    }

    fn is_owner_command(&self, name: &str) -> bool {
        self.config.owner_server.is_some() && self.config.owner_command == name
    }

    async fn replace_in_tree(&self, command: Command) -> HeraldResult<()> {
        let name = command.name.clone();
        let data = command.data();
        self.tree.write().replace(command);
        info!(command = %name, "Reloaded command");

        let scope = *self.main_scope.lock();
        if let Some(scope) = scope {
            self.sync.upsert(scope, &data).await?;
        }
        Ok(())
    }

    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    /// Shared handle to the main command tree
    pub fn tree(&self) -> Arc<RwLock<CommandTree>> {
        Arc::clone(&self.tree)
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.sync
    }

    pub fn router(&self) -> &InteractionRouter {
        &self.router
    }

    /// Scope the main tree is installed in, once known
    pub fn main_scope(&self) -> Option<Scope> {
        *self.main_scope.lock()
    }
}
