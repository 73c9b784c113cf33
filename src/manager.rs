//! ValeConfigManager - single entry point for the settings surface
//!
//! Resolves the effective binary/config/styles paths for the configured
//! [`Mode`], and routes style and install operations to the catalog, the
//! style store and the installer.

use crate::config::{Config, Mode};
use crate::errors::{Result, ValeError};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::installer::BinaryInstaller;
use crate::styles::{self, StyleCatalog, StyleRecord, StyleStore};
use crate::vale_ini::ValeIni;
use crate::validate::{PathValidator, ValidationErrorKind, ValidationResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const CONFIG_FILE_NAME: &str = ".vale.ini";

pub struct ValeConfigManager {
    config: Config,
    fetcher: Arc<dyn Fetcher>,
    catalog: StyleCatalog,
    validator: PathValidator,
}

impl ValeConfigManager {
    /// Manager using the real network
    pub fn new(config: Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.network.timeout_secs);
        let fetcher = HttpFetcher::new(timeout)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Manager with an injected fetcher
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        config.validate()?;
        let catalog = StyleCatalog::new(config.catalog.url.clone(), fetcher.clone())
            .with_cache_dir(config.cache_dir()?)
            .with_ttl(config.catalog.cache_ttl_secs);

        Ok(Self {
            config,
            fetcher,
            catalog,
            validator: PathValidator::host(),
        })
    }

    pub fn with_validator(mut self, validator: PathValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    fn require_managed(&self, action: &str) -> Result<()> {
        match self.config.mode {
            Mode::Managed => Ok(()),
            Mode::Custom => Err(ValeError::Config(format!(
                "{} is only available in managed mode",
                action
            ))),
        }
    }

    // === Paths ===

    pub fn installer(&self) -> Result<BinaryInstaller> {
        let bin_dir = self.config.data_dir()?.join("bin");
        let installer = BinaryInstaller::new(bin_dir, self.fetcher.clone())
            .with_version(self.config.managed.vale_version.clone())
            .with_base_url(self.config.managed.release_base_url.clone());
        Ok(installer)
    }

    /// Effective Vale binary path
    pub fn vale_path(&self) -> Result<PathBuf> {
        match self.config.mode {
            Mode::Managed => self.installer()?.binary_path(),
            Mode::Custom => self
                .config
                .custom
                .vale_path
                .clone()
                .ok_or_else(|| ValeError::Config("custom.vale_path is not set".into())),
        }
    }

    /// Effective `.vale.ini` path
    pub fn config_path(&self) -> Result<PathBuf> {
        match self.config.mode {
            Mode::Managed => Ok(self.config.data_dir()?.join(CONFIG_FILE_NAME)),
            Mode::Custom => self
                .config
                .custom
                .config_path
                .clone()
                .ok_or_else(|| ValeError::Config("custom.config_path is not set".into())),
        }
    }

    /// Effective styles directory
    ///
    /// Custom mode reads `StylesPath` from the user's config file.
    pub async fn styles_path(&self) -> Result<PathBuf> {
        match self.config.mode {
            Mode::Managed => Ok(self.config.data_dir()?.join("styles")),
            Mode::Custom => {
                let config_path = self.config_path()?;
                let ini = ValeIni::load(&config_path).await?;
                ini.resolved_styles_path(&config_path).ok_or_else(|| {
                    ValeError::Config(format!("StylesPath missing in {}", config_path.display()))
                })
            }
        }
    }

    pub async fn vale_path_exists(&self) -> bool {
        match self.vale_path() {
            Ok(p) => tokio::fs::try_exists(p).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    pub async fn config_path_exists(&self) -> bool {
        match self.config_path() {
            Ok(p) => tokio::fs::try_exists(p).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    // === Validation ===

    pub async fn validate_vale_path(&self) -> ValidationResult {
        match self.vale_path() {
            Ok(path) => self.validator.validate(&path).await,
            Err(e) => ValidationResult::failed(ValidationErrorKind::NotFound, e.to_string()),
        }
    }

    pub async fn validate_config_path(&self) -> ValidationResult {
        match self.config_path() {
            Ok(path) => self.validator.validate_config(&path).await,
            Err(e) => ValidationResult::failed(ValidationErrorKind::NotFound, e.to_string()),
        }
    }

    // === Install ===

    /// Install the Vale binary and seed the managed config
    ///
    /// With `best_effort`, download/extraction failures are logged and the
    /// expected path is returned regardless.
    pub async fn install_vale(&self, best_effort: bool) -> Result<PathBuf> {
        self.require_managed("Installing Vale")?;
        let installer = self.installer()?;

        let path = if best_effort {
            installer.install_best_effort().await?
        } else {
            installer.install().await?
        };

        self.ensure_managed_config().await?;
        Ok(path)
    }

    async fn ensure_managed_config(&self) -> Result<()> {
        let config_path = self.config_path()?;
        if !tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
            ValeIni::managed_default().save(&config_path).await?;
            tracing::info!("Wrote default Vale config to {}", config_path.display());
        }
        tokio::fs::create_dir_all(self.styles_path().await?).await?;
        Ok(())
    }

    // === Styles ===

    async fn style_store(&self) -> Result<StyleStore> {
        Ok(StyleStore::new(
            self.styles_path().await?,
            self.fetcher.clone(),
        ))
    }

    async fn installed_names(&self) -> Result<Vec<String>> {
        self.style_store().await?.installed_names().await
    }

    /// Installed styles enriched from the catalog
    ///
    /// Never fails; see [`styles::resolve_installed`] for the fallback.
    pub async fn installed_styles(&self) -> Vec<StyleRecord> {
        styles::resolve_installed(
            self.config.mode,
            self.installed_names(),
            self.catalog.styles(),
        )
        .await
    }

    /// Every style in the remote catalog
    pub async fn available_styles(&self) -> Result<Vec<StyleRecord>> {
        self.catalog.styles().await
    }

    async fn load_ini(&self) -> Result<ValeIni> {
        let path = self.config_path()?;
        if self.config.mode == Mode::Managed
            && !tokio::fs::try_exists(&path).await.unwrap_or(false)
        {
            return Ok(ValeIni::managed_default());
        }
        ValeIni::load(&path).await
    }

    /// Styles listed in `BasedOnStyles`
    pub async fn enabled_styles(&self) -> Result<Vec<String>> {
        Ok(self.load_ini().await?.enabled_styles())
    }

    /// Enable a style; returns false if it was already enabled
    pub async fn enable_style(&self, name: &str) -> Result<bool> {
        let mut ini = self.load_ini().await?;
        let changed = ini.enable_style(name);
        if changed {
            ini.save(&self.config_path()?).await?;
            tracing::info!("Enabled style {}", name);
        }
        Ok(changed)
    }

    /// Disable a style; returns false if it was not enabled
    pub async fn disable_style(&self, name: &str) -> Result<bool> {
        let mut ini = self.load_ini().await?;
        let changed = ini.disable_style(name);
        if changed {
            ini.save(&self.config_path()?).await?;
            tracing::info!("Disabled style {}", name);
        }
        Ok(changed)
    }

    /// Install a catalog style and enable it
    pub async fn install_style(&self, name: &str) -> Result<PathBuf> {
        self.require_managed("Installing styles")?;
        let style = self
            .catalog
            .get(name)
            .await?
            .ok_or_else(|| ValeError::StyleNotFound(name.to_string()))?;

        let dir = self.style_store().await?.install(&style).await?;
        self.enable_style(name).await?;
        Ok(dir)
    }

    /// Remove an installed style and disable it
    pub async fn uninstall_style(&self, name: &str) -> Result<()> {
        self.require_managed("Uninstalling styles")?;
        self.style_store().await?.uninstall(name).await?;
        self.disable_style(name).await?;
        Ok(())
    }
}
