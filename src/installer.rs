//! Vale binary installer
//!
//! Downloads the release archive for the host (or a chosen) target, unpacks it
//! in a staging directory next to the destination and moves the executable
//! into place.

use crate::archive;
use crate::errors::{Result, ValeError};
use crate::fetch::Fetcher;
use crate::platform::{Arch, Platform, Target};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where Vale releases are published
pub const DEFAULT_RELEASE_BASE_URL: &str = "https://github.com/errata-ai/vale/releases/download";

/// Release installed when nothing else is configured
pub const DEFAULT_VALE_VERSION: &str = "3.7.1";

pub struct BinaryInstaller {
    bin_dir: PathBuf,
    version: String,
    base_url: String,
    os: String,
    arch: String,
    fetcher: Arc<dyn Fetcher>,
}

impl BinaryInstaller {
    /// Installer for the host target writing into `bin_dir`
    pub fn new(bin_dir: impl Into<PathBuf>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            version: DEFAULT_VALE_VERSION.to_string(),
            base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            fetcher,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the target OS/arch identifiers (e.g. `"win32"`, `"x64"`)
    pub fn for_target(mut self, os: impl Into<String>, arch: impl Into<String>) -> Self {
        self.os = os.into();
        self.arch = arch.into();
        self
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    fn target(&self) -> Result<Target> {
        Ok(Target::new(
            Platform::from_os(&self.os)?,
            Arch::from_arch(&self.arch)?,
        ))
    }

    /// Download URL of the release archive for the configured target
    pub fn release_url(&self) -> Result<String> {
        let target = self.target()?;
        Ok(format!(
            "{}/v{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            target.asset_name(&self.version)
        ))
    }

    /// Path the binary is installed to for the configured target
    pub fn binary_path(&self) -> Result<PathBuf> {
        Ok(self.bin_dir.join(self.target()?.platform.binary_name()))
    }

    /// Download and install Vale, returning the binary path
    ///
    /// An unsupported target fails before anything is downloaded or created.
    pub async fn install(&self) -> Result<PathBuf> {
        let target = self.target()?;
        let url = self.release_url()?;
        let binary_name = target.platform.binary_name();

        tracing::info!(
            "Installing Vale {} for {} from {}",
            self.version,
            target.platform,
            url
        );
        let bytes = self.fetcher.fetch(&url).await?;

        tokio::fs::create_dir_all(&self.bin_dir).await?;
        let staging = tempfile::Builder::new()
            .prefix(".vale-download")
            .tempdir_in(&self.bin_dir)?;

        archive::extract(target.platform.archive_format(), bytes, staging.path()).await?;

        let extracted = archive::find_file(staging.path(), binary_name).ok_or_else(|| {
            ValeError::ExtractionFailure(format!("{} not found in release archive", binary_name))
        })?;

        let dest = self.bin_dir.join(binary_name);
        if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            tokio::fs::remove_file(&dest).await?;
        }
        tokio::fs::rename(&extracted, &dest).await?;
        make_executable(&dest)?;

        tracing::info!("Vale installed at {}", dest.display());
        Ok(dest)
    }

    /// Install, but never fail on download or extraction problems
    ///
    /// Those failures are logged and the expected binary path is returned
    /// anyway, so the caller cannot tell a failed install from a good one
    /// without validating the path. Only an unsupported target is an error.
    pub async fn install_best_effort(&self) -> Result<PathBuf> {
        let expected = self.binary_path()?;
        match self.install().await {
            Ok(path) => Ok(path),
            Err(e @ ValeError::UnsupportedPlatform(_)) => Err(e),
            Err(e) => {
                tracing::warn!(
                    "Vale install failed, continuing with {}: {}",
                    expected.display(),
                    e
                );
                Ok(expected)
            }
        }
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::{tgz_with, zip_with};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StaticFetcher {
        body: Result<Vec<u8>>,
        urls: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        fn ok(body: Vec<u8>) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                body: Err(ValeError::NetworkFailure("offline".to_string())),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.urls.lock().unwrap().push(url.to_string());
            match &self.body {
                Ok(b) => Ok(b.clone()),
                Err(e) => Err(ValeError::NetworkFailure(e.to_string())),
            }
        }
    }

    #[test]
    fn test_release_url() {
        let installer = BinaryInstaller::new("/tmp/bin", StaticFetcher::failing())
            .with_version("3.7.1")
            .for_target("linux", "x86_64");
        assert_eq!(
            installer.release_url().unwrap(),
            "https://github.com/errata-ai/vale/releases/download/v3.7.1/vale_3.7.1_Linux_64-bit.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_install_linux_tgz() {
        let tmp = TempDir::new().unwrap();
        let fetcher = StaticFetcher::ok(tgz_with(&[("vale", b"#!/bin/sh\necho vale\n")]));
        let installer = BinaryInstaller::new(tmp.path().join("bin"), fetcher.clone())
            .for_target("linux", "x86_64");

        let path = installer.install().await.unwrap();

        assert_eq!(path.file_name().unwrap(), "vale");
        assert!(path.is_file());
        assert_eq!(fetcher.calls().len(), 1);
        assert!(fetcher.calls()[0].ends_with(".tar.gz"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[tokio::test]
    async fn test_install_windows_zip() {
        let tmp = TempDir::new().unwrap();
        let fetcher = StaticFetcher::ok(zip_with(&[("vale.exe", b"MZ"), ("LICENSE", b"MIT")]));
        let installer =
            BinaryInstaller::new(tmp.path(), fetcher.clone()).for_target("win32", "x64");

        let path = installer.install().await.unwrap();

        assert_eq!(path, tmp.path().join("vale.exe"));
        assert!(fetcher.calls()[0].ends_with("_Windows_64-bit.zip"));
    }

    #[tokio::test]
    async fn test_install_replaces_existing_binary() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("vale"), "old").unwrap();
        let fetcher = StaticFetcher::ok(tgz_with(&[("vale", b"new")]));

        let path = BinaryInstaller::new(tmp.path(), fetcher)
            .for_target("darwin", "arm64")
            .install()
            .await
            .unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_unsupported_platform_does_not_download() {
        let tmp = TempDir::new().unwrap();
        let bin_dir = tmp.path().join("bin");
        let fetcher = StaticFetcher::ok(Vec::new());
        let installer =
            BinaryInstaller::new(&bin_dir, fetcher.clone()).for_target("freebsd", "x86_64");

        let err = installer.install().await.unwrap_err();
        assert!(matches!(err, ValeError::UnsupportedPlatform(_)));
        assert!(fetcher.calls().is_empty());
        assert!(!bin_dir.exists());

        let err = installer.install_best_effort().await.unwrap_err();
        assert!(matches!(err, ValeError::UnsupportedPlatform(_)));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_archive_without_binary() {
        let tmp = TempDir::new().unwrap();
        let fetcher = StaticFetcher::ok(tgz_with(&[("README.md", b"no binary here")]));
        let installer =
            BinaryInstaller::new(tmp.path(), fetcher).for_target("linux", "aarch64");

        let err = installer.install().await.unwrap_err();
        assert!(matches!(err, ValeError::ExtractionFailure(_)));
    }

    #[tokio::test]
    async fn test_best_effort_swallows_download_failure() {
        let tmp = TempDir::new().unwrap();
        let installer = BinaryInstaller::new(tmp.path(), StaticFetcher::failing())
            .for_target("linux", "x86_64");

        assert!(matches!(installer.install().await, Err(ValeError::NetworkFailure(_))));

        let path = installer.install_best_effort().await.unwrap();
        assert_eq!(path, tmp.path().join("vale"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_best_effort_swallows_extraction_failure() {
        let tmp = TempDir::new().unwrap();
        let fetcher = StaticFetcher::ok(b"not an archive".to_vec());
        let installer = BinaryInstaller::new(tmp.path(), fetcher).for_target("linux", "x86_64");

        let err = installer.install().await.unwrap_err();
        assert!(matches!(err, ValeError::ExtractionFailure(_)));

        let path = installer.install_best_effort().await.unwrap();
        assert_eq!(path, tmp.path().join("vale"));
        assert!(!path.exists());

        let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with(".vale-download"))
            .collect();
        assert!(leftovers.is_empty(), "staging dirs left: {:?}", leftovers);
    }
}
