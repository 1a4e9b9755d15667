//! Drift between desired and remote command lists

use serde::Serialize;
use std::fmt;

use crate::commands::CommandData;
use crate::remote::RemoteCommand;

/// A remote command whose payload differs from the desired one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedUpdate {
    pub current: RemoteCommand,
    pub desired: CommandData,
}

/// What it takes to make a scope's remote list match the desired list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncPlan {
    /// Desired commands with no remote counterpart
    pub create: Vec<CommandData>,
    /// Remote commands to edit
    pub update: Vec<PlannedUpdate>,
    /// Remote commands nothing desires
    pub delete: Vec<RemoteCommand>,
    /// Remote commands that already match
    pub unchanged: Vec<RemoteCommand>,
}

impl SyncPlan {
    /// Whether the remote list already matches
    pub fn is_in_sync(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

impl fmt::Display for SyncPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create.len(),
            self.update.len(),
            self.delete.len(),
            self.unchanged.len()
        )
    }
}

/// Diff `desired` against `remote`, matching commands by name
///
/// Output keeps the order of `desired` for creates and updates and the
/// order of `remote` for deletes.
pub fn plan(desired: &[CommandData], remote: &[RemoteCommand]) -> SyncPlan {
    let mut result = SyncPlan::default();

    for data in desired {
        match remote.iter().find(|r| r.name == data.name) {
            Some(current) if current.data == *data => result.unchanged.push(current.clone()),
            Some(current) => result.update.push(PlannedUpdate {
                current: current.clone(),
                desired: data.clone(),
            }),
            None => result.create.push(data.clone()),
        }
    }

    result.delete = remote
        .iter()
        .filter(|r| !desired.iter().any(|d| d.name == r.name))
        .cloned()
        .collect();

    result
}
