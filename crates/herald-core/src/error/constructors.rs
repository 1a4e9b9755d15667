//! Constructor methods for HeraldError

use super::types::{HeraldError, LoadError};

impl HeraldError {
    /// Create a load error for a command
    pub fn load(command_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load(LoadError::new(command_name, message))
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error for a path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a parse error for a file
    pub fn parse(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a missing resource error
    pub fn missing_resource(command: impl Into<String>, scope: impl std::fmt::Display) -> Self {
        Self::MissingResource {
            command: command.into(),
            scope: scope.to_string(),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
