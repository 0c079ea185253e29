//! config
//!
//! Loading and saving engine configuration.
//!
//! The configuration file is TOML, conventionally named `engine.toml` next
//! to the repository snapshot it belongs to. See [`schema::EngineConfig`]
//! for the fields.

pub mod schema;

use std::path::Path;

use thiserror::Error;

pub use schema::EngineConfig;

/// Errors from configuration loading and saving.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("config i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or fails identifier validation.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized.
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Load engine configuration from a TOML file.
pub fn load(path: &Path) -> Result<EngineConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Save engine configuration to a TOML file.
pub fn save(config: &EngineConfig, path: &Path) -> Result<(), ConfigError> {
    let raw = toml::to_string_pretty(config)?;
    std::fs::write(path, raw)?;
    Ok(())
}
