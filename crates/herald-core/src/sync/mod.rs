//! Scope registry and remote synchronization
//!
//! The default scope receives the whole command tree in one bulk replace at
//! startup. Guild commands are tracked per guild in the [`ScopeRegistry`]
//! and kept in step incrementally by the [`Synchronizer`]:
//!
//! - a guild appearing is reconciled: matching remote commands are adopted,
//!   drifted ones edited, missing ones created
//! - a guild disappearing only drops the local handles
//! - `update` and `delete` act on one command in one guild
//!
//! A create refused for the daily quota puts the scope into a 24 hour
//! cool-down during which further creates are skipped.

mod cooldown;
mod plan;
mod scope_registry;
mod synchronizer;

pub use cooldown::{COOLDOWN, CooldownSet};
pub use plan::{PlannedUpdate, SyncPlan, plan};
pub use scope_registry::{GuildCommand, ScopeRegistry};
pub use synchronizer::{ReconcileReport, Synchronizer};
