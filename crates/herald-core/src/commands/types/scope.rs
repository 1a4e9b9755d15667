//! Installation scopes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a guild (a single community the bot is installed in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub u64);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GuildId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(GuildId)
    }
}

impl From<u64> for GuildId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Where a command is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// The application-wide (global) command list
    Default,
    /// The command list of a single guild
    Guild(GuildId),
}

impl Scope {
    /// Guild id of a guild scope
    pub fn guild(&self) -> Option<GuildId> {
        match self {
            Scope::Default => None,
            Scope::Guild(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Default => write!(f, "default scope"),
            Scope::Guild(id) => write!(f, "guild {}", id),
        }
    }
}

impl From<GuildId> for Scope {
    fn from(id: GuildId) -> Self {
        Scope::Guild(id)
    }
}
