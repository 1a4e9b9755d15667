//! In-memory remote registry

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use super::types::{CommandId, RemoteCommand, RemoteError, RemoteRegistry};
use crate::commands::{CommandData, Scope};

/// A call received by a [`MemoryRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    List(Scope),
    Create(Scope, String),
    Edit(Scope, CommandId),
    Delete(Scope, CommandId),
    ReplaceAll(Scope, usize),
}

impl RecordedCall {
    pub fn is_create(&self) -> bool {
        matches!(self, RecordedCall::Create(..))
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, RecordedCall::Edit(..))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, RecordedCall::Delete(..))
    }

    /// Whether the call changes remote state
    pub fn is_write(&self) -> bool {
        !matches!(self, RecordedCall::List(_))
    }
}

#[derive(Default)]
struct MemoryState {
    scopes: HashMap<Scope, Vec<RemoteCommand>>,
    calls: Vec<RecordedCall>,
    create_failures: VecDeque<RemoteError>,
    edit_failures: VecDeque<RemoteError>,
    replace_failures: VecDeque<RemoteError>,
}

/// Remote registry that keeps every scope's command list in memory
///
/// Creating a command whose name already exists in the scope overwrites it,
/// as the platform does. Failures can be queued for the next create, edit
/// or bulk replace.
#[derive(Default)]
pub struct MemoryRegistry {
    state: Mutex<MemoryState>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a command directly, bypassing the call log
    pub fn seed(&self, scope: Scope, data: CommandData) -> RemoteCommand {
        let mut state = self.state.lock();
        upsert(state.scopes.entry(scope).or_default(), data)
    }

    /// Current command list of a scope
    pub fn commands(&self, scope: Scope) -> Vec<RemoteCommand> {
        self.state
            .lock()
            .scopes
            .get(&scope)
            .cloned()
            .unwrap_or_default()
    }

    /// Command named `name` in a scope
    pub fn find(&self, scope: Scope, name: &str) -> Option<RemoteCommand> {
        self.commands(scope).into_iter().find(|c| c.name == name)
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Make the next create fail with `error`
    pub fn fail_next_create(&self, error: RemoteError) {
        self.state.lock().create_failures.push_back(error);
    }

    /// Make the next edit fail with `error`
    pub fn fail_next_edit(&self, error: RemoteError) {
        self.state.lock().edit_failures.push_back(error);
    }

    /// Make the next bulk replace fail with `error`
    pub fn fail_next_replace_all(&self, error: RemoteError) {
        self.state.lock().replace_failures.push_back(error);
    }

    /// Drop a command behind the registry's back, as another process would
    pub fn remove_silently(&self, scope: Scope, name: &str) {
        if let Some(commands) = self.state.lock().scopes.get_mut(&scope) {
            commands.retain(|c| c.name != name);
        }
    }
}

fn upsert(commands: &mut Vec<RemoteCommand>, data: CommandData) -> RemoteCommand {
    if let Some(existing) = commands.iter_mut().find(|c| c.name == data.name) {
        existing.data = data;
        return existing.clone();
    }

    let command = RemoteCommand {
        id: CommandId(uuid::Uuid::new_v4().to_string()),
        name: data.name.clone(),
        data,
    };
    commands.push(command.clone());
    command
}

#[async_trait]
impl RemoteRegistry for MemoryRegistry {
    async fn list(&self, scope: Scope) -> Result<Vec<RemoteCommand>, RemoteError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::List(scope));
        Ok(state.scopes.get(&scope).cloned().unwrap_or_default())
    }

    async fn create(&self, scope: Scope, data: &CommandData) -> Result<RemoteCommand, RemoteError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::Create(scope, data.name.clone()));
        if let Some(error) = state.create_failures.pop_front() {
            return Err(error);
        }
        Ok(upsert(state.scopes.entry(scope).or_default(), data.clone()))
    }

    async fn edit(
        &self,
        scope: Scope,
        id: &CommandId,
        data: &CommandData,
    ) -> Result<RemoteCommand, RemoteError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::Edit(scope, id.clone()));
        if let Some(error) = state.edit_failures.pop_front() {
            return Err(error);
        }

        let command = state
            .scopes
            .get_mut(&scope)
            .and_then(|commands| commands.iter_mut().find(|c| &c.id == id))
            .ok_or_else(|| RemoteError::NotFound {
                scope,
                id: id.clone(),
            })?;
        command.name = data.name.clone();
        command.data = data.clone();
        Ok(command.clone())
    }

    async fn delete(&self, scope: Scope, id: &CommandId) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::Delete(scope, id.clone()));

        let commands = state.scopes.entry(scope).or_default();
        let before = commands.len();
        commands.retain(|c| &c.id != id);
        if commands.len() == before {
            return Err(RemoteError::NotFound {
                scope,
                id: id.clone(),
            });
        }
        Ok(())
    }

    async fn replace_all(
        &self,
        scope: Scope,
        data: &[CommandData],
    ) -> Result<Vec<RemoteCommand>, RemoteError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::ReplaceAll(scope, data.len()));
        if let Some(error) = state.replace_failures.pop_front() {
            return Err(error);
        }

        let mut previous = state.scopes.remove(&scope).unwrap_or_default();
        let mut next = Vec::with_capacity(data.len());
        for item in data {
            let command = match previous.iter().position(|c| c.name == item.name) {
                Some(index) => {
                    let mut command = previous.swap_remove(index);
                    command.data = item.clone();
                    command
                }
                None => RemoteCommand {
                    id: CommandId(uuid::Uuid::new_v4().to_string()),
                    name: item.name.clone(),
                    data: item.clone(),
                },
            };
            next.push(command);
        }
        state.scopes.insert(scope, next.clone());
        Ok(next)
    }
}
