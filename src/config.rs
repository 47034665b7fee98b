//! Configuration for tracking-gate.

use crate::payment::Price;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Price charged to unlock a shipment's history.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Local access cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Gate workflow configuration.
    #[serde(default)]
    pub gate: FlowConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Canonical unlock price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Amount in minor currency units (pence, cents).
    #[serde(default = "default_amount_minor")]
    pub amount_minor: u64,

    /// ISO 4217 currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Local access cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of identifiers held in the cache.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Days an unlock flag stays valid after it is written.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,
}

/// Gate workflow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Simulated processing latency after a card form is submitted.
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            cache: CacheConfig::default(),
            gate: FlowConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            amount_minor: default_amount_minor(),
            currency: default_currency(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_days: default_ttl_days(),
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
        }
    }
}

impl PricingConfig {
    /// The configured price.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::new(self.amount_minor, &self.currency)
    }
}

impl FlowConfig {
    /// The simulated processing latency as a [`Duration`].
    #[must_use]
    pub const fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

const fn default_amount_minor() -> u64 {
    199
}

fn default_currency() -> String {
    "GBP".to_string()
}

const fn default_cache_capacity() -> usize {
    10_000
}

const fn default_ttl_days() -> u32 {
    30
}

const fn default_processing_delay_ms() -> u64 {
    1_000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default location of the configuration file.
#[must_use]
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "tracking-gate")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".tracking-gate/config.toml"))
}

impl GateConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
