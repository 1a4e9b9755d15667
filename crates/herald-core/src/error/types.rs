//! Core error types

use crate::remote::RemoteError;
use thiserror::Error;

/// Result type alias for Herald operations
pub type HeraldResult<T> = Result<T, HeraldError>;

/// A command definition failed to load or validate.
///
/// Raised while the command tree is built. A single `LoadError` aborts the
/// load pass it occurred in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to load command '{command_name}': {message}")]
pub struct LoadError {
    /// Name of the command (or option) the violation was found in
    pub command_name: String,
    /// What was wrong
    pub message: String,
}

impl LoadError {
    /// Create a new load error for the given command
    pub fn new(command_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            message: message.into(),
        }
    }
}

/// Main error type for Herald
#[derive(Error, Debug, Clone)]
pub enum HeraldError {
    /// A command definition is malformed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The remote command registry rejected a request
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors while reading definitions or config
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// A definition or config file could not be parsed
    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    /// An update was requested for a command that has no remote resource
    #[error("Tried to update command '{command}' for {scope}, but no remote command exists")]
    MissingResource { command: String, scope: String },

    /// Generic error
    #[error("Error: {message}")]
    Other { message: String },
}

impl HeraldError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load(_) => "HERALD_LOAD",
            Self::Remote(_) => "HERALD_REMOTE",
            Self::Config { .. } => "HERALD_CONFIG",
            Self::Io { .. } => "HERALD_IO",
            Self::Parse { .. } => "HERALD_PARSE",
            Self::MissingResource { .. } => "HERALD_MISSING_RESOURCE",
            Self::Other { .. } => "HERALD_OTHER",
        }
    }

    /// The load error inside this error, if any
    pub fn as_load(&self) -> Option<&LoadError> {
        match self {
            Self::Load(err) => Some(err),
            _ => None,
        }
    }
}
