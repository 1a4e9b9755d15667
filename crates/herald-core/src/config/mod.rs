//! Configuration
//!
//! [`HeraldConfig`] controls where definitions are read from and how the
//! folder layout is interpreted. It can be read from a JSON, TOML or YAML
//! file with [`load_config`]; environment variables override file values.
//! Middleware is code and is set on the builder instead.

mod loader;
mod model;

pub use loader::{ConfigLoader, ConfigSource, load_config};
pub use model::{HeraldConfig, LoggingConfig};
