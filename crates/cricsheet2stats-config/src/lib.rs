// cricsheet2stats-config - Unified configuration for both binaries
//
// Supports configuration from multiple sources:
// 1. Environment variables (CRICSHEET2STATS_* prefix, highest priority)
// 2. Explicit config file path (--config flag)
// 3. Default config file locations (./cricsheet2stats.toml, ./config.toml)
// 4. Built-in defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod env_overrides;
mod sources;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};

/// Main runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

/// Input corpus and output table locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory of match JSON documents, one per match.
    pub matches_dir: String,
    /// Directory the four stats tables are written to and served from.
    pub tables_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            matches_dir: "./match_data".to_string(),
            tables_dir: "./player_data".to_string(),
        }
    }
}

/// Query service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// tracing filter directive: trace, debug, info, warn, error
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl RuntimeConfig {
    /// Load from an explicit config file path, then apply env overrides.
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Try default config file locations, fall back to built-in defaults,
    /// then apply env overrides.
    pub fn load_or_default() -> Result<Self> {
        sources::load_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.data.matches_dir.trim().is_empty() {
            anyhow::bail!("data.matches_dir must not be empty");
        }
        if self.data.tables_dir.trim().is_empty() {
            anyhow::bail!("data.tables_dir must not be empty");
        }
        if let Some(server) = &self.server {
            if server.listen_addr.trim().is_empty() {
                anyhow::bail!("server.listen_addr must not be empty");
            }
            if !server.listen_addr.contains(':') {
                anyhow::bail!(
                    "server.listen_addr must be host:port, got '{}'",
                    server.listen_addr
                );
            }
        }
        Ok(())
    }
}
