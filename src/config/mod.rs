//! Configuration management for vale-config

use crate::errors::{Result, ValeError};
use crate::installer::{DEFAULT_RELEASE_BASE_URL, DEFAULT_VALE_VERSION};
use crate::styles::DEFAULT_CATALOG_URL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Environment variable overriding the config file location
pub const CONFIG_FILE_ENV: &str = "VALE_CONFIG_FILE";

/// Who owns the Vale installation and its styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// This tool downloads Vale and installs styles into its own data directory
    #[default]
    Managed,
    /// The user points at an existing Vale binary and config
    Custom,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Managed => write!(f, "managed"),
            Mode::Custom => write!(f, "custom"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub custom: CustomConfig,
    pub managed: ManagedConfig,
    pub catalog: CatalogConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CustomConfig {
    pub vale_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManagedConfig {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
    pub vale_version: String,
    pub release_base_url: String,
}

impl Default for ManagedConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            vale_version: DEFAULT_VALE_VERSION.to_string(),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub url: String,
    pub cache_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            cache_ttl_secs: 86400, // 24 hours
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout for catalog and archive downloads
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl Config {
    /// Load configuration from default location or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ValeError::Config(format!("{}: {}", path.display(), e)))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            return Ok(PathBuf::from(path));
        }
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "vale-config") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ValeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject URLs that could never be fetched
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("catalog.url", &self.catalog.url),
            ("managed.release_base_url", &self.managed.release_base_url),
        ] {
            let parsed = url::Url::parse(value)
                .map_err(|e| ValeError::Config(format!("{} is not a valid URL: {}", field, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ValeError::Config(format!(
                    "{} must be http(s), got {}",
                    field,
                    parsed.scheme()
                )));
            }
        }
        Ok(())
    }

    /// Directory holding the managed binary, config and styles
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.managed.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_local_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| ValeError::Config("Could not determine data directory".into()))?;
        Ok(data_dir.join("vale-config"))
    }

    /// Directory for the cached style catalog
    pub fn cache_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("cache"))
    }
}
