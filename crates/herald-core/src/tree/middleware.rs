//! Load-time middleware

use std::fmt;
use std::sync::Arc;

use crate::commands::Command;

/// A stage that may rewrite a command after it is read and before it is
/// validated
pub trait Middleware: Send + Sync {
    fn apply(&self, command: Command) -> Command;
}

impl<F> Middleware for F
where
    F: Fn(Command) -> Command + Send + Sync,
{
    fn apply(&self, command: Command) -> Command {
        self(command)
    }
}

/// Ordered middleware pipeline
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    stages: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage
    pub fn push(&mut self, stage: impl Middleware + 'static) {
        self.stages.push(Arc::new(stage));
    }

    /// Append a stage (builder style)
    pub fn with(mut self, stage: impl Middleware + 'static) -> Self {
        self.push(stage);
        self
    }

    /// Run every stage in order
    pub fn apply(&self, command: Command) -> Command {
        self.stages
            .iter()
            .fold(command, |command, stage| stage.apply(command))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("stages", &self.stages.len())
            .finish()
    }
}
