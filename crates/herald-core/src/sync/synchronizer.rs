//! Remote synchronization

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::cooldown::CooldownSet;
use super::plan::plan;
use super::scope_registry::ScopeRegistry;
use crate::commands::{CommandData, GuildId, Scope};
use crate::error::{HeraldError, HeraldResult};
use crate::remote::{RemoteCommand, RemoteError, RemoteRegistry};

/// Outcome of reconciling one guild
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Remote commands that already matched and were adopted
    pub adopted: Vec<String>,
    /// Remote commands adopted and then edited to the desired payload
    pub updated: Vec<String>,
    /// Commands created
    pub created: Vec<String>,
    /// Creates skipped because the scope is cooling down
    pub skipped: Vec<String>,
    /// Remote commands deleted because the guild is now excluded
    pub removed: Vec<String>,
    /// Commands whose step failed; siblings were still reconciled
    pub failed: Vec<(String, HeraldError)>,
}

impl ReconcileReport {
    /// Whether every step succeeded
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Applies local command state to the remote registry
///
/// Operations on different commands or scopes may run concurrently; callers
/// serialize operations on the same command in the same scope.
pub struct Synchronizer {
    remote: Arc<dyn RemoteRegistry>,
    registry: Arc<RwLock<ScopeRegistry>>,
    cooldown: CooldownSet,
    default_scope: Scope,
}

impl Synchronizer {
    pub fn new(remote: Arc<dyn RemoteRegistry>, registry: ScopeRegistry) -> Self {
        Self {
            remote,
            registry: Arc::new(RwLock::new(registry)),
            cooldown: CooldownSet::default(),
            default_scope: Scope::Default,
        }
    }

    /// Push the main tree to this scope instead of the global list
    pub fn with_default_scope(mut self, scope: Scope) -> Self {
        self.default_scope = scope;
        self
    }

    /// Override the cool-down length
    pub fn with_cooldown(mut self, duration: Duration) -> Self {
        self.cooldown = CooldownSet::new(duration);
        self
    }

    pub fn default_scope(&self) -> Scope {
        self.default_scope
    }

    pub fn cooldown(&self) -> &CooldownSet {
        &self.cooldown
    }

    pub fn remote(&self) -> &Arc<dyn RemoteRegistry> {
        &self.remote
    }

    /// Shared handle to the scope registry
    pub fn registry(&self) -> Arc<RwLock<ScopeRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Replace the default scope's command list in one call
    pub async fn push_default(&self, data: &[CommandData]) -> HeraldResult<Vec<RemoteCommand>> {
        self.push_all(self.default_scope, data).await
    }

    /// Replace a scope's command list in one call
    pub async fn push_all(&self, scope: Scope, data: &[CommandData]) -> HeraldResult<Vec<RemoteCommand>> {
        let handles = self.remote.replace_all(scope, data).await?;
        info!(scope = %scope, commands = handles.len(), "Registered commands");
        Ok(handles)
    }

    /// Make `data` exist in `scope`: edit the same-named remote command if it
    /// drifted, create it if there is none
    ///
    /// Returns `None` when a create was skipped for the cool-down.
    pub async fn upsert(&self, scope: Scope, data: &CommandData) -> HeraldResult<Option<RemoteCommand>> {
        let existing = self
            .remote
            .list(scope)
            .await?
            .into_iter()
            .find(|c| c.name == data.name);

        match existing {
            Some(current) if current.data == *data => Ok(Some(current)),
            Some(current) => match self.remote.edit(scope, &current.id, data).await {
                Ok(handle) => Ok(Some(handle)),
                Err(err) if err.is_not_found() => self.create_in(scope, data).await,
                Err(err) => Err(err.into()),
            },
            None => self.create_in(scope, data).await,
        }
    }

    /// Create `name` in `guild` if it is included there and has no handle
    ///
    /// Returns the created handle, or `None` when nothing was created.
    pub async fn create_if_missing(&self, name: &str, guild: GuildId) -> HeraldResult<Option<RemoteCommand>> {
        let data = {
            let registry = self.registry.read();
            let command = registry.get(name).ok_or_else(|| unknown(name))?;
            if !command.is_included(guild) || command.handle(guild).is_some() {
                return Ok(None);
            }
            command.effective_data(guild)?
        };

        let created = self.create_in(Scope::Guild(guild), &data).await?;
        if let Some(handle) = &created {
            self.registry.write().set_handle(name, guild, handle.clone());
        }
        Ok(created)
    }

    /// Bring a guild that just appeared in step with the registry
    ///
    /// Included commands are adopted, edited or created. Registry commands
    /// the guild is now excluded from are deleted if they exist remotely.
    /// Fails only if the guild's remote list cannot be read. Failures of
    /// single commands are collected in the report.
    pub async fn reconcile_on_scope_appear(&self, guild: GuildId) -> HeraldResult<ReconcileReport> {
        let scope = Scope::Guild(guild);
        let mut report = ReconcileReport::default();

        let mut desired = Vec::new();
        let mut excluded = HashSet::new();
        {
            let registry = self.registry.read();
            for command in registry.iter() {
                if !command.is_included(guild) {
                    excluded.insert(command.name().to_string());
                    continue;
                }
                match command.effective_data(guild) {
                    Ok(data) => desired.push(data),
                    Err(err) => {
                        error!(command = %command.name(), scope = %scope, error = %err, "Invalid per-guild options");
                        report.failed.push((command.name().to_string(), err.into()));
                    }
                }
            }
        }
        if desired.is_empty() && excluded.is_empty() && report.failed.is_empty() {
            return Ok(report);
        }

        let remote = self.remote.list(scope).await?;
        let plan = plan(&desired, &remote);

        let (stale, foreign): (Vec<_>, Vec<_>) = plan
            .delete
            .into_iter()
            .partition(|handle| excluded.contains(&handle.name));
        if !foreign.is_empty() {
            debug!(scope = %scope, commands = foreign.len(), "Leaving remote commands this process does not manage");
        }

        for handle in stale {
            let name = handle.name.clone();
            match self.delete_remote(scope, &handle).await {
                Ok(()) => {
                    self.registry.write().clear_handle(&name, guild);
                    info!(command = %name, scope = %scope, "Removed excluded command");
                    report.removed.push(name);
                }
                Err(err) => {
                    error!(command = %name, scope = %scope, error = %err, "Failed to remove excluded command");
                    report.failed.push((name, err));
                }
            }
        }

        for handle in plan.unchanged {
            let name = handle.name.clone();
            self.registry.write().set_handle(&name, guild, handle);
            report.adopted.push(name);
        }

        for update in plan.update {
            let name = update.desired.name.clone();
            match self.remote.edit(scope, &update.current.id, &update.desired).await {
                Ok(handle) => {
                    self.registry.write().set_handle(&name, guild, handle);
                    report.updated.push(name);
                }
                Err(err) if err.is_not_found() => {
                    self.record_create(&mut report, guild, &update.desired).await;
                }
                Err(err) => {
                    error!(command = %name, scope = %scope, error = %err, "Failed to update command");
                    report.failed.push((name, err.into()));
                }
            }
        }

        for data in plan.create {
            self.record_create(&mut report, guild, &data).await;
        }

        info!(
            scope = %scope,
            adopted = report.adopted.len(),
            updated = report.updated.len(),
            created = report.created.len(),
            removed = report.removed.len(),
            failed = report.failed.len(),
            "Reconciled guild commands"
        );
        Ok(report)
    }

    async fn record_create(&self, report: &mut ReconcileReport, guild: GuildId, data: &CommandData) {
        let scope = Scope::Guild(guild);
        match self.create_in(scope, data).await {
            Ok(Some(handle)) => {
                self.registry.write().set_handle(&data.name, guild, handle);
                report.created.push(data.name.clone());
            }
            Ok(None) => report.skipped.push(data.name.clone()),
            Err(err) => {
                error!(command = %data.name, scope = %scope, error = %err, "Failed to create command");
                report.failed.push((data.name.clone(), err));
            }
        }
    }

    /// Forget every handle in a guild the bot left. No remote call is made.
    pub fn reconcile_on_scope_remove(&self, guild: GuildId) -> usize {
        let dropped = self.registry.write().clear_scope(guild);
        debug!(guild = %guild, handles = dropped, "Dropped guild command handles");
        dropped
    }

    /// Apply the current policy and definition of `name` in `guild`
    ///
    /// An excluded command is deleted if it exists remotely, found through
    /// its handle or by name. An included one is edited (recreated if the
    /// remote command vanished) or, without a remote command, created when
    /// `create_if_missing` is set.
    pub async fn update(
        &self,
        name: &str,
        guild: GuildId,
        create_if_missing: bool,
    ) -> HeraldResult<Option<RemoteCommand>> {
        let scope = Scope::Guild(guild);
        let (included, cached) = {
            let registry = self.registry.read();
            let command = registry.get(name).ok_or_else(|| unknown(name))?;
            (command.is_included(guild), command.handle(guild).cloned())
        };

        if !included {
            let handle = match cached {
                Some(handle) => Some(handle),
                None => self.adopt(name, guild).await?,
            };
            if let Some(handle) = handle {
                self.delete_remote(scope, &handle).await?;
                self.registry.write().clear_handle(name, guild);
                info!(command = %name, scope = %scope, "Removed excluded command");
            }
            return Ok(None);
        }

        let data = {
            let registry = self.registry.read();
            registry.get(name).ok_or_else(|| unknown(name))?.effective_data(guild)?
        };

        let handle = match cached {
            Some(handle) => Some(handle),
            None => self.adopt(name, guild).await?,
        };

        let updated = match handle {
            Some(handle) => match self.remote.edit(scope, &handle.id, &data).await {
                Ok(updated) => Some(updated),
                Err(err) if err.is_not_found() => {
                    debug!(command = %name, scope = %scope, "Remote command vanished; recreating");
                    self.registry.write().clear_handle(name, guild);
                    self.create_in(scope, &data).await?
                }
                Err(err) => return Err(err.into()),
            },
            None if create_if_missing => self.create_in(scope, &data).await?,
            None => return Err(HeraldError::missing_resource(name, scope)),
        };

        if let Some(handle) = &updated {
            self.registry.write().set_handle(name, guild, handle.clone());
        }
        Ok(updated)
    }

    /// Delete `name` from `guild`
    ///
    /// Uses the cached handle or looks the command up by name. Returns
    /// whether a remote command was found; a missing one is not an error.
    pub async fn delete(&self, name: &str, guild: GuildId) -> HeraldResult<bool> {
        let scope = Scope::Guild(guild);
        let cached = {
            let registry = self.registry.read();
            registry.get(name).ok_or_else(|| unknown(name))?.handle(guild).cloned()
        };

        let handle = match cached {
            Some(handle) => Some(handle),
            None => self.adopt(name, guild).await?,
        };
        let Some(handle) = handle else {
            return Ok(false);
        };

        self.delete_remote(scope, &handle).await?;
        self.registry.write().clear_handle(name, guild);
        Ok(true)
    }

    /// Find `name` in the guild's remote list and remember it
    async fn adopt(&self, name: &str, guild: GuildId) -> HeraldResult<Option<RemoteCommand>> {
        let found = self
            .remote
            .list(Scope::Guild(guild))
            .await?
            .into_iter()
            .find(|c| c.name == name);
        if let Some(handle) = &found {
            self.registry.write().set_handle(name, guild, handle.clone());
        }
        Ok(found)
    }

    async fn delete_remote(&self, scope: Scope, handle: &RemoteCommand) -> HeraldResult<()> {
        match self.remote.delete(scope, &handle.id).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(command = %handle.name, scope = %scope, "Remote command was already gone");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Create in a scope unless it is cooling down
    async fn create_in(&self, scope: Scope, data: &CommandData) -> HeraldResult<Option<RemoteCommand>> {
        if self.cooldown.contains(scope) {
            debug!(command = %data.name, scope = %scope, "Skipping create during cool-down");
            return Ok(None);
        }

        match self.remote.create(scope, data).await {
            Ok(handle) => {
                debug!(command = %data.name, scope = %scope, id = %handle.id, "Created command");
                Ok(Some(handle))
            }
            Err(RemoteError::RateLimited { scope: limited }) => {
                self.cooldown.enter(limited);
                warn!(command = %data.name, scope = %limited, "Command create skipped for quota");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn unknown(name: &str) -> HeraldError {
    HeraldError::other(format!("Unknown guild command '{}'", name))
}
