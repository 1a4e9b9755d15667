//! Create-quota cool-down

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::commands::Scope;

/// How long a scope stays suppressed after its daily create quota ran out
pub const COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);

/// Scopes in which creates are currently suppressed
///
/// Each entry is removed by the timer task spawned when it was inserted.
/// Clones share the same set.
#[derive(Debug, Clone)]
pub struct CooldownSet {
    scopes: Arc<Mutex<HashSet<Scope>>>,
    duration: Duration,
}

impl Default for CooldownSet {
    fn default() -> Self {
        Self::new(COOLDOWN)
    }
}

impl CooldownSet {
    pub fn new(duration: Duration) -> Self {
        Self {
            scopes: Arc::new(Mutex::new(HashSet::new())),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.scopes.lock().contains(&scope)
    }

    /// Suppress creates in `scope` and schedule the expiry
    ///
    /// Returns `false` if the scope was already cooling down; no second
    /// timer is started then. Must be called inside a tokio runtime.
    pub fn enter(&self, scope: Scope) -> bool {
        if !self.scopes.lock().insert(scope) {
            return false;
        }
        warn!(
            scope = %scope,
            hours = self.duration.as_secs() / 3600,
            "Daily command create quota reached; pausing creates"
        );

        let scopes = Arc::clone(&self.scopes);
        let deadline = tokio::time::Instant::now() + self.duration;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            scopes.lock().remove(&scope);
            debug!(scope = %scope, "Command create cool-down expired");
        });
        true
    }

    pub fn len(&self) -> usize {
        self.scopes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.lock().is_empty()
    }
}
