//! Remote command registry
//!
//! The platform keeps one command list per [`Scope`]. This module defines
//! the capability the synchronizer needs from it, and an in-memory
//! implementation.
//!
//! [`Scope`]: crate::commands::Scope

mod memory;
mod types;

pub use memory::{MemoryRegistry, RecordedCall};
pub use types::{CommandId, RemoteCommand, RemoteError, RemoteRegistry};

#[cfg(test)]
pub use types::MockRemoteRegistry;
