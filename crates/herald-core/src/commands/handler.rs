//! Handler traits and the explicit handler registry

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::types::{CommandOption, GuildId};
use crate::interaction::{AutocompleteInteraction, CommandInteraction};

/// Runs a command invocation
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handle the invocation
    async fn run(&self, interaction: &CommandInteraction) -> anyhow::Result<()>;
}

/// Answers autocomplete requests for a command's options
#[async_trait]
pub trait AutocompleteHandler: Send + Sync {
    /// Handle the autocomplete request
    async fn complete(&self, interaction: &AutocompleteInteraction) -> anyhow::Result<()>;
}

/// Decides per guild whether a guild command is installed, and with which
/// options
pub trait ScopePolicy: Send + Sync {
    /// Whether the command should exist in this guild
    fn should_create_for(&self, guild: GuildId) -> bool {
        let _ = guild;
        true
    }

    /// Options to install in this guild. `None` keeps the static options.
    fn options_for(&self, guild: GuildId) -> Option<Vec<CommandOption>> {
        let _ = guild;
        None
    }
}

/// Policy that installs a command everywhere with its static options
#[derive(Debug, Clone, Copy, Default)]
pub struct AllScopes;

impl ScopePolicy for AllScopes {}

type GuildPredicate = dyn Fn(GuildId) -> bool + Send + Sync;
type GuildOptions = dyn Fn(GuildId) -> Option<Vec<CommandOption>> + Send + Sync;

/// Closure-backed [`ScopePolicy`]
pub struct ScopeFilter {
    predicate: Box<GuildPredicate>,
    options: Option<Box<GuildOptions>>,
}

impl ScopeFilter {
    /// Install only in guilds for which `predicate` holds
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(GuildId) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            options: None,
        }
    }

    /// Supply per-guild options
    pub fn with_options<F>(mut self, options: F) -> Self
    where
        F: Fn(GuildId) -> Option<Vec<CommandOption>> + Send + Sync + 'static,
    {
        self.options = Some(Box::new(options));
        self
    }
}

impl ScopePolicy for ScopeFilter {
    fn should_create_for(&self, guild: GuildId) -> bool {
        (self.predicate)(guild)
    }

    fn options_for(&self, guild: GuildId) -> Option<Vec<CommandOption>> {
        self.options.as_ref().and_then(|options| options(guild))
    }
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(CommandInteraction) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn run(&self, interaction: &CommandInteraction) -> anyhow::Result<()> {
        (self.0)(interaction.clone()).await
    }
}

struct FnAutocomplete<F>(F);

#[async_trait]
impl<F, Fut> AutocompleteHandler for FnAutocomplete<F>
where
    F: Fn(AutocompleteInteraction) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn complete(&self, interaction: &AutocompleteInteraction) -> anyhow::Result<()> {
        (self.0)(interaction.clone()).await
    }
}

/// Wrap an async closure as a [`CommandHandler`]
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn CommandHandler>
where
    F: Fn(CommandInteraction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// Wrap an async closure as an [`AutocompleteHandler`]
pub fn autocomplete_fn<F, Fut>(f: F) -> Arc<dyn AutocompleteHandler>
where
    F: Fn(AutocompleteInteraction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(FnAutocomplete(f))
}

/// The code half of a command: what a definition file cannot express
#[derive(Clone, Default)]
pub struct CommandBinding {
    pub run: Option<Arc<dyn CommandHandler>>,
    pub autocomplete: Option<Arc<dyn AutocompleteHandler>>,
    pub scope_policy: Option<Arc<dyn ScopePolicy>>,
}

impl CommandBinding {
    /// Create a binding with a run handler
    pub fn new(run: Arc<dyn CommandHandler>) -> Self {
        Self {
            run: Some(run),
            autocomplete: None,
            scope_policy: None,
        }
    }

    /// Set the autocomplete handler
    pub fn with_autocomplete(mut self, autocomplete: Arc<dyn AutocompleteHandler>) -> Self {
        self.autocomplete = Some(autocomplete);
        self
    }

    /// Set the per-guild policy (guild commands only)
    pub fn with_scope_policy(mut self, policy: Arc<dyn ScopePolicy>) -> Self {
        self.scope_policy = Some(policy);
        self
    }
}

impl fmt::Debug for CommandBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBinding")
            .field("run", &self.run.is_some())
            .field("autocomplete", &self.autocomplete.is_some())
            .field("scope_policy", &self.scope_policy.is_some())
            .finish()
    }
}

/// Handlers keyed by the path of the definition file that declares them
///
/// Paths use `/` separators and no extension: `"ping"`, `"admin/kick"`,
/// `"#guild/vote"`.
#[derive(Clone, Default, Debug)]
pub struct HandlerRegistry {
    bindings: HashMap<String, CommandBinding>,
    fallback: Option<CommandBinding>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a path (builder style)
    pub fn bind(mut self, path: impl Into<String>, binding: CommandBinding) -> Self {
        self.insert(path, binding);
        self
    }

    /// Bind a path, returning the previous binding
    pub fn insert(&mut self, path: impl Into<String>, binding: CommandBinding) -> Option<CommandBinding> {
        self.bindings.insert(normalize(&path.into()), binding)
    }

    /// Serve every unbound path with this binding
    pub fn with_fallback(mut self, binding: CommandBinding) -> Self {
        self.fallback = Some(binding);
        self
    }

    /// Binding for a path, or the fallback
    pub fn get(&self, path: &str) -> Option<&CommandBinding> {
        self.bindings
            .get(&normalize(path))
            .or(self.fallback.as_ref())
    }

    /// Whether the path has an explicit binding
    pub fn contains(&self, path: &str) -> bool {
        self.bindings.contains_key(&normalize(path))
    }

    /// Number of explicit bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no explicit bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}
