//! Configuration module for the embedding store.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `VECSEARCH_` and use double
//! underscores to separate nested levels:
//! - `VECSEARCH_EMBEDDING__TIMEOUT_MS=2000` sets `embedding.timeout_ms`
//! - `VECSEARCH_SEARCH__DEFAULT_TOP_K=10` sets `search.default_top_k`
//! - `VECSEARCH_LOGGING__LEVEL=debug` sets `logging.level`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{VectorResult, VectorStoreError};

/// Directory holding the settings file, searched for in every ancestor.
pub const CONFIG_DIR: &str = ".vecsearch";
pub const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "VECSEARCH_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Defaults applied to search requests
    #[serde(default)]
    pub search: SearchConfig,

    /// Defaults applied to list requests
    #[serde(default)]
    pub list: ListConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// "hash" or "fastembed"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Width of every stored and queried vector
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Model to use when `provider = "fastembed"`
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Per-call embedding deadline in milliseconds (0 disables)
    #[serde(default)]
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    #[serde(default)]
    pub default_threshold: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ListConfig {
    #[serde(default = "default_list_limit")]
    pub default_limit: usize,

    /// Characters of text kept in a list preview
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_provider() -> String {
    "hash".to_string()
}
fn default_dimension() -> usize {
    crate::vector::VECTOR_DIMENSION_384
}
fn default_embedding_model() -> String {
    "AllMiniLML6V2".to_string()
}
fn default_top_k() -> usize {
    5
}
fn default_list_limit() -> usize {
    100
}
fn default_preview_chars() -> usize {
    100
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
            list: ListConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            dimension: default_dimension(),
            model: default_embedding_model(),
            timeout_ms: 0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            default_threshold: 0.0,
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_limit: default_list_limit(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    ///
    /// The settings file is the nearest `.vecsearch/settings.toml` walking up
    /// from the current directory. A missing file leaves defaults in place.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| Path::new(CONFIG_DIR).join(CONFIG_FILE));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nested levels, single underscore
            // stays part of the field name
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find the nearest settings file by looking for a `.vecsearch` directory
    /// from the current directory up to the filesystem root
    pub fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE))
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> VectorResult<()> {
        if self.embedding.dimension == 0 {
            return Err(VectorStoreError::invalid_argument(
                "embedding.dimension must be greater than zero",
            ));
        }
        if !matches!(self.embedding.provider.as_str(), "hash" | "fastembed") {
            return Err(VectorStoreError::invalid_argument(format!(
                "unknown embedding provider '{}'. Supported: hash, fastembed",
                self.embedding.provider
            )));
        }
        if self.search.default_top_k == 0 {
            return Err(VectorStoreError::invalid_argument(
                "search.default_top_k must be a positive integer",
            ));
        }
        if !(-1.0..=1.0).contains(&self.search.default_threshold) {
            return Err(VectorStoreError::invalid_argument(format!(
                "search.default_threshold must lie within [-1.0, 1.0], got {}",
                self.search.default_threshold
            )));
        }
        Ok(())
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Self::init_config_file_in(std::env::current_dir()?, force)
    }

    /// Create a default settings file with helpful comments under `root`
    pub fn init_config_file_in(
        root: impl AsRef<Path>,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

const CONFIG_TEMPLATE: &str = r#"# vecsearch configuration file

# Version of the configuration schema
version = 1

[embedding]
# Embedding provider: "hash" (deterministic stub, always available)
# or "fastembed" (local model, requires the fastembed build feature)
provider = "hash"

# Width of every stored and queried vector
dimension = 384

# Model used by the fastembed provider
model = "AllMiniLML6V2"

# Abort an embedding call after this many milliseconds (0 = never)
timeout_ms = 0

[search]
# Results returned when a search request omits top_k
default_top_k = 5

# Minimum cosine similarity when a search request omits threshold (-1.0 to 1.0)
default_threshold = 0.0

[list]
# Records returned when a list request omits limit
default_limit = 100

# Characters of text shown in a list preview
preview_chars = 100

[logging]
# Log filter used when RUST_LOG is unset (logs go to stderr)
level = "warn"
"#;
