use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::ChainId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chains: ChainsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_account_endpoint() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_account_chain_id() -> ChainId {
    31_337
}

fn default_object_endpoint() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./state/catalog.sqlite")
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_ipfs_gateway() -> String {
    "https://ipfs.io/ipfs".to_string()
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainsConfig {
    #[serde(default)]
    pub account: AccountChainConfig,
    #[serde(default)]
    pub object: ObjectChainConfig,
}

impl Default for ChainsConfig {
    fn default() -> Self {
        Self {
            account: AccountChainConfig::default(),
            object: ObjectChainConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountChainConfig {
    #[serde(default = "default_account_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_account_chain_id")]
    pub chain_id: ChainId,
}

impl Default for AccountChainConfig {
    fn default() -> Self {
        Self {
            endpoint: default_account_endpoint(),
            chain_id: default_account_chain_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectChainConfig {
    #[serde(default = "default_object_endpoint")]
    pub endpoint: String,
}

impl Default for ObjectChainConfig {
    fn default() -> Self {
        Self {
            endpoint: default_object_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_ipfs_gateway")]
    pub ipfs_gateway: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            ipfs_gateway: default_ipfs_gateway(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Config = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        if !config.cache.path.is_absolute() {
            config.cache.path = config_base.join(&config.cache.path);
        }
        if !config.logging.dir.is_absolute() {
            config.logging.dir = config_base.join(&config.logging.dir);
        }

        Ok(config)
    }
}
