//! From trait implementations for HeraldError conversions

use super::types::HeraldError;

impl From<anyhow::Error> for HeraldError {
    fn from(error: anyhow::Error) -> Self {
        Self::other(error.to_string())
    }
}

impl From<std::io::Error> for HeraldError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for HeraldError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(error.to_string(), "<json>")
    }
}
