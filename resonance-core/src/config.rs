//! Service configuration
//!
//! ```yaml
//! seed: 42
//! relationship_strategy: energy_gap
//! seed_default_artists: true
//! store:
//!   kind: file
//!   dir: data
//! logging:
//!   directory: logs
//!   file_prefix: resonance.log
//!   level: info
//! access:
//!   enabled: true
//!   default_tier: free
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::access::Tier;
use crate::artist::RelationshipStrategy;
use crate::error::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResonanceConfig {
    /// Seed for the random source; entropy when absent
    pub seed: Option<u64>,
    /// How encounters are classified
    pub relationship_strategy: RelationshipStrategy,
    /// Register the five founding artists on startup
    pub seed_default_artists: bool,
    /// Record store
    pub store: StoreConfig,
    /// Logging
    pub logging: LoggingConfig,
    /// Access gate
    pub access: AccessConfig,
}

impl Default for ResonanceConfig {
    fn default() -> Self {
        Self {
            seed: None,
            relationship_strategy: RelationshipStrategy::default(),
            seed_default_artists: true,
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            access: AccessConfig::default(),
        }
    }
}

impl ResonanceConfig {
    /// Parse from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| Error::Config(format!("Failed to parse config YAML: {}", e)))
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&yaml)
    }

    /// Install the global subscriber described by the `logging` section
    pub fn init_logging(&self) -> Result<()> {
        crate::logging::init_logging(&self.logging.directory, &self.logging.file_prefix, &self.logging.level)
    }
}

/// Which record store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Nothing survives a restart
    #[default]
    Memory,
    /// JSONL files in [`StoreConfig::dir`]
    File,
}

/// Record store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend
    pub kind: StoreKind,
    /// Data directory for the file backend
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            dir: PathBuf::from("data"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for rotated log files
    pub directory: String,
    /// Log file prefix
    pub file_prefix: String,
    /// Default level, overridden by RUST_LOG
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_prefix: "resonance.log".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Access gate settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Enforce tier quotas; everything is allowed when off
    pub enabled: bool,
    /// Tier assumed for callers that do not state one
    pub default_tier: Tier,
}
