//! # Terminal Configuration
//!
//! Where the database lives and how restocks blend cost.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_DB_PATH=/srv/stockroom.db                                │
//! │     STOCKROOM_COST_POLICY=overwrite                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $STOCKROOM_CONFIG, or                                              │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockroom.stockroom/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     <data dir>/stockroom.db, weighted_average                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stockroom.toml
//! database_path = "/var/lib/stockroom/stockroom.db"  # or ":memory:"
//! cost_policy = "weighted_average"                    # weighted_average | overwrite
//! max_connections = 5
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use stockroom_core::CostPolicy;
use stockroom_db::DbConfig;

pub const ENV_DB_PATH: &str = "STOCKROOM_DB_PATH";
pub const ENV_COST_POLICY: &str = "STOCKROOM_COST_POLICY";
pub const ENV_CONFIG: &str = "STOCKROOM_CONFIG";

const CONFIG_FILE_NAME: &str = "stockroom.toml";
const DB_FILE_NAME: &str = "stockroom.db";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

/// Contents of `stockroom.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub database_path: Option<PathBuf>,
    pub cost_policy: Option<String>,
    pub max_connections: Option<u32>,
}

/// Resolved terminal configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub cost_policy: CostPolicy,
    pub max_connections: u32,
    /// The file that was read, if any.
    pub config_file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from the process environment and config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolves configuration with `env` standing in for the environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn resolve(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("com", "stockroom", "stockroom");

        let config_path = env(ENV_CONFIG)
            .map(PathBuf::from)
            .or_else(|| dirs.as_ref().map(|d| d.config_dir().join(CONFIG_FILE_NAME)));

        let (file, config_file) = match config_path {
            Some(path) if path.exists() => (read_file(&path)?, Some(path)),
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                (FileConfig::default(), None)
            }
            None => (FileConfig::default(), None),
        };

        let database_path = match env(ENV_DB_PATH).map(PathBuf::from).or(file.database_path) {
            Some(path) => path,
            None => dirs
                .as_ref()
                .map(|d| d.data_dir().join(DB_FILE_NAME))
                .ok_or(ConfigError::NoDataDir)?,
        };

        let cost_policy = match env(ENV_COST_POLICY).or(file.cost_policy) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "cost_policy".to_string(),
                value: raw,
            })?,
            None => CostPolicy::default(),
        };

        let max_connections = file.max_connections.unwrap_or(5);
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections".to_string(),
                value: "0".to_string(),
            });
        }

        let config = AppConfig {
            database_path,
            cost_policy,
            max_connections,
            config_file,
        };
        info!(
            path = %config.database_path.display(),
            cost_policy = %config.cost_policy,
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Pool settings for [`stockroom_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        let config = DbConfig::new(&self.database_path);
        if config.is_in_memory() {
            DbConfig::in_memory()
        } else {
            config.max_connections(self.max_connections)
        }
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    info!(?path, "Loading config from file");
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn temp_file(tag: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "stockroom-config-{}-{}.toml",
            tag,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_env_overrides_file() {
        let path = temp_file(
            "override",
            "database_path = \"/from/file.db\"\ncost_policy = \"overwrite\"\nmax_connections = 3\n",
        );
        let env = env_of(&[
            (ENV_CONFIG, path.display().to_string()),
            (ENV_DB_PATH, "/from/env.db".to_string()),
        ]);

        let config = AppConfig::resolve(env).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/from/env.db"));
        assert_eq!(config.cost_policy, CostPolicy::Overwrite);
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.config_file.as_deref(), Some(path.as_path()));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let env = env_of(&[
            (ENV_CONFIG, "/definitely/not/here/stockroom.toml".to_string()),
            (ENV_DB_PATH, ":memory:".to_string()),
        ]);

        let config = AppConfig::resolve(env).unwrap();
        assert_eq!(config.cost_policy, CostPolicy::WeightedAverage);
        assert_eq!(config.max_connections, 5);
        assert!(config.config_file.is_none());
        assert!(config.db_config().is_in_memory());
        assert_eq!(config.db_config().max_connections, 1);
    }

    #[test]
    fn test_invalid_cost_policy() {
        let env = env_of(&[
            (ENV_CONFIG, "/definitely/not/here/stockroom.toml".to_string()),
            (ENV_DB_PATH, ":memory:".to_string()),
            (ENV_COST_POLICY, "fifo".to_string()),
        ]);

        let err = AppConfig::resolve(env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "cost_policy"));
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_file("malformed", "max_connections = \"many\"\n");
        let env = env_of(&[(ENV_CONFIG, path.display().to_string())]);

        let err = AppConfig::resolve(env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let _ = std::fs::remove_file(path);
    }
}
