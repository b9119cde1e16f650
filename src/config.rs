//! World configuration.
//!
//! Supports TOML config files, environment variable overrides, and
//! defaults.

use crate::error::{EcsError, Result};
use crate::signature::MAX_COMPONENT_BITS;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Tunables for a [`World`](crate::world::World).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Maximum number of component kinds that may be registered
    /// (1 to 64, default: 64 — the signature bit width).
    pub max_component_kinds: usize,
    /// Initial capacity of the entity table (default: 1024).
    pub initial_entity_capacity: usize,
    /// Log a warning when a component is re-added to an entity that
    /// already carries it (default: true).
    pub warn_on_duplicate_add: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_component_kinds: MAX_COMPONENT_BITS,
            initial_entity_capacity: 1024,
            warn_on_duplicate_add: true,
        }
    }
}

impl WorldConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EcsError::ConfigError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| EcsError::ConfigError(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a TOML file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| EcsError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.as_ref(), toml)
            .map_err(|e| EcsError::ConfigError(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Applies environment variable overrides, prefixed with `ECS_`.
    /// Example: `ECS_MAX_COMPONENT_KINDS=32` overrides
    /// `max_component_kinds`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("ECS_MAX_COMPONENT_KINDS") {
            self.max_component_kinds = val.parse().map_err(|_| {
                EcsError::ConfigError(format!("Invalid max_component_kinds: {}", val))
            })?;
        }
        if let Ok(val) = env::var("ECS_INITIAL_ENTITY_CAPACITY") {
            self.initial_entity_capacity = val.parse().map_err(|_| {
                EcsError::ConfigError(format!("Invalid initial_entity_capacity: {}", val))
            })?;
        }
        if let Ok(val) = env::var("ECS_WARN_ON_DUPLICATE_ADD") {
            self.warn_on_duplicate_add = val.parse().map_err(|_| {
                EcsError::ConfigError(format!("Invalid warn_on_duplicate_add: {}", val))
            })?;
        }
        self.validate()
    }

    /// Checks that the kind bound fits the signature representation.
    pub fn validate(&self) -> Result<()> {
        if self.max_component_kinds == 0 || self.max_component_kinds > MAX_COMPONENT_BITS {
            return Err(EcsError::ConfigError(format!(
                "max_component_kinds must be between 1 and {}, got {}",
                MAX_COMPONENT_BITS, self.max_component_kinds
            )));
        }
        Ok(())
    }
}
