//! Configuration for generation and caching
//!
//! Loaded from a JSON file; every field has a default so partial files work.

use crate::error::{HeavyMatrixError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file used by the CLI
pub const CONFIG_ENV: &str = "HEAVYMATRIX_CONFIG";

/// Cache file used by the CLI when the config names none
pub const DEFAULT_CACHE_FILE: &str = "heavymatrix-cache.json";

/// Controls the generate-and-validate loop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Cap on candidates per generation call; `None` retries without limit
    pub max_attempts: Option<u64>,
}

impl GeneratorConfig {
    /// A cap of zero would allow no candidate at all
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == Some(0) {
            return Err(HeavyMatrixError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Controls the seed-keyed matrix cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached matrices before the oldest is evicted
    pub capacity: usize,
    /// JSON file backing the cache; in-memory only when unset
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 128,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeavyMatrixConfig {
    pub generator: GeneratorConfig,
    pub cache: CacheConfig,
}

impl HeavyMatrixConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.generator.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `HEAVYMATRIX_CONFIG`, or use defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Back the cache with [`DEFAULT_CACHE_FILE`] unless a path is set
    pub fn with_default_cache_file(mut self) -> Self {
        self.cache
            .path
            .get_or_insert_with(|| PathBuf::from(DEFAULT_CACHE_FILE));
        self
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
