//! Configuration loading for the Regionward engine.
//!
//! Reads `regionward.yaml` and deserializes it into strongly-typed
//! structs. Every field has a default, so an empty document is a valid
//! configuration.

use std::path::Path;

use regionward_session::SessionConfig;
use regionward_types::WorldConfigs;
use serde::Deserialize;

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "REGIONWARD_LOG_LEVEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuardConfig {
    /// Session manager tuning.
    #[serde(default)]
    pub session: SessionConfig,

    /// Region index maintenance.
    #[serde(default)]
    pub regions: RegionsConfig,

    /// Per-world policy switches.
    #[serde(default)]
    pub worlds: WorldConfigs,

    /// Host dependencies whose enabling or disabling resets every session
    /// (default: `["CommandBook"]`). Matched case-insensitively.
    #[serde(default = "default_watched_dependencies")]
    pub watched_dependencies: Vec<String>,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            regions: RegionsConfig::default(),
            worlds: WorldConfigs::default(),
            watched_dependencies: default_watched_dependencies(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GuardConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `REGIONWARD_LOG_LEVEL` overrides `logging.level`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// Region index maintenance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionsConfig {
    /// Server ticks between region cache invalidations (default: 2).
    #[serde(default = "default_cache_invalidation_ticks")]
    pub cache_invalidation_ticks: u64,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            cache_invalidation_ticks: default_cache_invalidation_ticks(),
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Apply `REGIONWARD_LOG_LEVEL` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.level = level;
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_watched_dependencies() -> Vec<String> {
    vec![String::from("CommandBook")]
}

const fn default_cache_invalidation_ticks() -> u64 {
    2
}

fn default_log_level() -> String {
    "info".to_owned()
}
