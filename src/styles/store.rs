//! On-disk style directory: listing, installing and removing styles

use super::{StyleRecord, BUILTIN_STYLE};
use crate::archive;
use crate::errors::{Result, ValeError};
use crate::fetch::Fetcher;
use crate::platform::ArchiveFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Vale keeps vocabularies and other non-style data here
const RESERVED_DIRS: &[&str] = &["config"];

pub struct StyleStore {
    styles_dir: PathBuf,
    fetcher: Arc<dyn Fetcher>,
}

impl StyleStore {
    pub fn new(styles_dir: impl Into<PathBuf>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            styles_dir: styles_dir.into(),
            fetcher,
        }
    }

    pub fn styles_dir(&self) -> &Path {
        &self.styles_dir
    }

    /// Directory for a style, refusing names that escape the styles dir or
    /// collide with Vale's own data directories
    fn style_dir(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ValeError::StyleNotFound(name.to_string()));
        }
        if RESERVED_DIRS.contains(&name) {
            return Err(ValeError::Config(format!(
                "{} is reserved by Vale and cannot be managed as a style",
                name
            )));
        }
        Ok(self.styles_dir.join(name))
    }

    /// Installed style names: the built-in style first, then directories A-Z
    pub async fn installed_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        match tokio::fs::read_dir(&self.styles_dir).await {
            Ok(mut entries) => {
                while let Some(entry) = entries.next_entry().await? {
                    if !entry.file_type().await?.is_dir() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy().to_string();
                    if name.starts_with('.') || RESERVED_DIRS.contains(&name.as_str()) {
                        continue;
                    }
                    if name != BUILTIN_STYLE {
                        names.push(name);
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "Styles directory {} does not exist yet",
                    self.styles_dir.display()
                );
            }
            Err(e) => return Err(e.into()),
        }

        names.sort();
        names.insert(0, BUILTIN_STYLE.to_string());
        Ok(names)
    }

    pub async fn is_installed(&self, name: &str) -> bool {
        match self.style_dir(name) {
            Ok(dir) => tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_dir()),
            Err(_) => false,
        }
    }

    /// Download a style package and unpack it as `<styles_dir>/<name>`
    pub async fn install(&self, style: &StyleRecord) -> Result<PathBuf> {
        let dest = self.style_dir(&style.name)?;
        let url = style.url.as_deref().ok_or_else(|| {
            ValeError::StyleNotFound(format!("{} has no download URL", style.name))
        })?;

        tracing::info!("Installing style {} from {}", style.name, url);
        let bytes = self.fetcher.fetch(url).await?;

        tokio::fs::create_dir_all(&self.styles_dir).await?;
        let staging = tempfile::Builder::new()
            .prefix(".style-download")
            .tempdir_in(&self.styles_dir)?;
        archive::extract(ArchiveFormat::Zip, bytes, staging.path()).await?;

        if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            tokio::fs::remove_dir_all(&dest).await?;
        }

        // Packages normally wrap everything in a folder named after the style
        let nested = staging.path().join(&style.name);
        if tokio::fs::metadata(&nested).await.is_ok_and(|m| m.is_dir()) {
            tokio::fs::rename(&nested, &dest).await?;
        } else {
            tokio::fs::create_dir_all(&dest).await?;
            let mut entries = tokio::fs::read_dir(staging.path()).await?;
            while let Some(entry) = entries.next_entry().await? {
                tokio::fs::rename(entry.path(), dest.join(entry.file_name())).await?;
            }
        }

        tracing::info!("Style {} installed at {}", style.name, dest.display());
        Ok(dest)
    }

    /// Remove `<styles_dir>/<name>`
    pub async fn uninstall(&self, name: &str) -> Result<()> {
        if name == BUILTIN_STYLE {
            return Err(ValeError::BuiltinStyle(name.to_string()));
        }
        let dir = self.style_dir(name)?;
        if !self.is_installed(name).await {
            return Err(ValeError::StyleNotFound(name.to_string()));
        }
        tokio::fs::remove_dir_all(&dir).await?;
        tracing::info!("Removed style {}", name);
        Ok(())
    }
}
