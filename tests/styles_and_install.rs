//! Library-level tests for the manager: install, style resolution and config edits
//!
//! Network access is replaced by an in-memory fetcher keyed by URL.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use vale_config_manager::platform::Platform;
use vale_config_manager::styles::{self, StyleRecord};
use vale_config_manager::{
    BinaryInstaller, Config, Fetcher, Mode, PathValidator, ValeConfigManager, ValeError,
    ValidationErrorKind,
};

const CATALOG_URL: &str = "https://styles.example.com/library.json";

#[derive(Default)]
struct MemoryFetcher {
    responses: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), body);
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> vale_config_manager::Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ValeError::DownloadFailure {
                url: url.to_string(),
                reason: "HTTP 404".to_string(),
            })
    }
}

fn zip_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }
    buf.into_inner()
}

fn tgz_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, *name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn catalog_json() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!([
        {
            "name": "Google",
            "description": "Google Developer Documentation Style Guide",
            "homepage": "https://github.com/errata-ai/Google",
            "url": "https://styles.example.com/Google.zip"
        },
        {
            "name": "Microsoft",
            "description": "Microsoft Writing Style Guide",
            "homepage": "https://github.com/errata-ai/Microsoft",
            "url": "https://styles.example.com/Microsoft.zip"
        }
    ]))
    .unwrap()
}

fn config(tmp: &TempDir, mode: Mode) -> Config {
    let mut config = Config::default();
    config.mode = mode;
    config.managed.data_dir = Some(tmp.path().join("data"));
    config.catalog.url = CATALOG_URL.to_string();
    config.catalog.cache_ttl_secs = 0;
    config
}

fn build_manager(
    config: Config,
    fetcher: MemoryFetcher,
) -> (ValeConfigManager, Arc<MemoryFetcher>) {
    let fetcher = Arc::new(fetcher);
    let manager = ValeConfigManager::with_fetcher(config, fetcher.clone()).unwrap();
    (manager, fetcher)
}

// === Installer ===

#[tokio::test]
async fn test_install_returns_platform_binary_name() {
    for (os, archive) in [
        ("win32", zip_archive(&[("vale.exe", b"MZ")])),
        ("darwin", tgz_archive(&[("vale", b"#!/bin/sh\n")])),
        ("linux", tgz_archive(&[("vale", b"#!/bin/sh\n")])),
    ] {
        let tmp = TempDir::new().unwrap();
        let planner = BinaryInstaller::new(tmp.path(), Arc::new(MemoryFetcher::default()))
            .for_target(os, "x86_64");
        let url = planner.release_url().unwrap();

        let fetcher = Arc::new(MemoryFetcher::default().with(&url, archive));
        let path = BinaryInstaller::new(tmp.path(), fetcher)
            .for_target(os, "x86_64")
            .install()
            .await
            .unwrap();

        let expected = Platform::from_os(os).unwrap().binary_name();
        assert_eq!(path.file_name().unwrap(), expected, "platform {}", os);
        assert!(path.is_file());
    }
}

#[tokio::test]
async fn test_install_unsupported_platform_never_downloads() {
    let tmp = TempDir::new().unwrap();
    for os in ["freebsd", "openbsd", "android"] {
        let fetcher = Arc::new(MemoryFetcher::default());
        let err = BinaryInstaller::new(tmp.path().join("bin"), fetcher.clone())
            .for_target(os, "x86_64")
            .install()
            .await
            .unwrap_err();

        assert!(matches!(err, ValeError::UnsupportedPlatform(_)));
        assert!(fetcher.requests().is_empty());
    }
    assert!(!tmp.path().join("bin").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_manager_install_seeds_config_and_validates() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp, Mode::Managed);

    let (offline, _) = build_manager(config.clone(), MemoryFetcher::default());
    let url = offline.installer().unwrap().release_url().unwrap();

    let (manager, _) = build_manager(
        config,
        MemoryFetcher::default().with(&url, tgz_archive(&[("vale", b"#!/bin/sh\n")])),
    );

    assert!(!manager.validate_vale_path().await.valid);
    let path = manager.install_vale(false).await.unwrap();

    assert_eq!(path, manager.vale_path().unwrap());
    assert!(manager.validate_vale_path().await.valid);
    assert!(manager.validate_config_path().await.valid);
    assert!(manager.styles_path().await.unwrap().is_dir());
    assert_eq!(manager.enabled_styles().await.unwrap(), ["Vale"]);
}

#[tokio::test]
async fn test_manager_best_effort_install_hides_failure() {
    let tmp = TempDir::new().unwrap();
    let (manager, fetcher) = build_manager(config(&tmp, Mode::Managed), MemoryFetcher::default());

    if Platform::current().is_err() {
        return;
    }

    assert!(manager.install_vale(false).await.is_err());

    let path = manager.install_vale(true).await.unwrap();
    assert_eq!(path, manager.vale_path().unwrap());
    assert!(!path.exists());
    assert_eq!(
        manager.validate_vale_path().await.kind,
        Some(ValidationErrorKind::NotFound)
    );
    assert_eq!(fetcher.requests().len(), 2);
}

// === Path validation ===

#[cfg(unix)]
#[tokio::test]
async fn test_windows_validator_accepts_non_executable_file() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let vale = tmp.path().join("vale.exe");
    std::fs::write(&vale, "MZ").unwrap();
    std::fs::set_permissions(&vale, std::fs::Permissions::from_mode(0o600)).unwrap();

    let mut config = config(&tmp, Mode::Custom);
    config.custom.vale_path = Some(vale.clone());
    let (manager, _) = build_manager(config, MemoryFetcher::default());

    let linux = manager.validate_vale_path().await;
    assert_eq!(linux.kind, Some(ValidationErrorKind::NotExecutable));

    let manager = manager.with_validator(PathValidator::new(Platform::Windows));
    assert!(manager.validate_vale_path().await.valid);
}

#[tokio::test]
async fn test_custom_mode_without_paths_is_invalid() {
    let tmp = TempDir::new().unwrap();
    let (manager, _) = build_manager(config(&tmp, Mode::Custom), MemoryFetcher::default());

    let result = manager.validate_vale_path().await;
    assert!(!result.valid);
    assert!(result.error.unwrap().contains("vale_path"));
    assert!(!manager.config_path_exists().await);
}

// === Styles ===

fn custom_project(tmp: &TempDir, styles: &[&str]) -> std::path::PathBuf {
    let project = tmp.path().join("project");
    for style in styles {
        std::fs::create_dir_all(project.join(".github/styles").join(style)).unwrap();
    }
    let ini = project.join(".vale.ini");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::write(
        &ini,
        "StylesPath = .github/styles\n\n[*]\nBasedOnStyles = Vale, Google\n",
    )
    .unwrap();
    ini
}

#[tokio::test]
async fn test_custom_mode_strips_catalog_urls() {
    let tmp = TempDir::new().unwrap();
    let ini = custom_project(&tmp, &["Google", "MyCustomStyle"]);

    let mut config = config(&tmp, Mode::Custom);
    config.custom.config_path = Some(ini);
    let (manager, _) = build_manager(
        config,
        MemoryFetcher::default().with(CATALOG_URL, catalog_json()),
    );

    let styles = manager.installed_styles().await;
    let names: Vec<_> = styles.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Vale", "Google", "MyCustomStyle"]);

    assert_eq!(styles[0], StyleRecord::custom("Vale"));
    assert_eq!(styles[1].url, None);
    assert_eq!(
        styles[1].homepage.as_deref(),
        Some("https://github.com/errata-ai/Google")
    );
    assert_eq!(styles[2], StyleRecord::custom("MyCustomStyle"));
    assert!(styles.iter().all(|s| s.url.is_none()));
}

#[tokio::test]
async fn test_custom_mode_missing_config_falls_back() {
    let tmp = TempDir::new().unwrap();
    let mut config = config(&tmp, Mode::Custom);
    config.custom.config_path = Some(tmp.path().join("nope").join(".vale.ini"));
    let (manager, fetcher) = build_manager(
        config,
        MemoryFetcher::default().with(CATALOG_URL, catalog_json()),
    );

    assert_eq!(manager.installed_styles().await, styles::fallback_styles());
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_managed_install_and_uninstall_style() {
    let tmp = TempDir::new().unwrap();
    let (manager, _) = build_manager(
        config(&tmp, Mode::Managed),
        MemoryFetcher::default()
            .with(CATALOG_URL, catalog_json())
            .with(
                "https://styles.example.com/Google.zip",
                zip_archive(&[("Google/Headings.yml", b"extends: capitalization\n")]),
            ),
    );

    let dir = manager.install_style("Google").await.unwrap();
    assert!(dir.join("Headings.yml").is_file());
    assert_eq!(manager.enabled_styles().await.unwrap(), ["Vale", "Google"]);

    let installed = manager.installed_styles().await;
    assert_eq!(installed.len(), 2);
    assert_eq!(
        installed[1].url.as_deref(),
        Some("https://styles.example.com/Google.zip")
    );

    manager.uninstall_style("Google").await.unwrap();
    assert!(!dir.exists());
    assert_eq!(manager.enabled_styles().await.unwrap(), ["Vale"]);
}

#[tokio::test]
async fn test_install_unknown_style() {
    let tmp = TempDir::new().unwrap();
    let (manager, _) = build_manager(
        config(&tmp, Mode::Managed),
        MemoryFetcher::default().with(CATALOG_URL, catalog_json()),
    );

    let err = manager.install_style("google").await.unwrap_err();
    assert!(matches!(err, ValeError::StyleNotFound(_)));
    assert_eq!(err.to_string(), "Style not found: google");
}

#[tokio::test]
async fn test_style_changes_rejected_in_custom_mode() {
    let tmp = TempDir::new().unwrap();
    let ini = custom_project(&tmp, &["Google"]);
    let mut config = config(&tmp, Mode::Custom);
    config.custom.config_path = Some(ini.clone());
    let (manager, fetcher) = build_manager(config, MemoryFetcher::default());

    assert!(matches!(
        manager.install_style("Google").await,
        Err(ValeError::Config(_))
    ));
    assert!(matches!(
        manager.uninstall_style("Google").await,
        Err(ValeError::Config(_))
    ));
    assert!(fetcher.requests().is_empty());
    assert!(is_dir(&ini.parent().unwrap().join(".github/styles/Google")));

    // Enabling only edits the user's config
    assert!(manager.enable_style("Microsoft").await.unwrap());
    let content = std::fs::read_to_string(&ini).unwrap();
    assert!(content.contains("BasedOnStyles = Vale, Google, Microsoft"));
}

#[tokio::test]
async fn test_available_styles_propagates_errors() {
    let tmp = TempDir::new().unwrap();
    let (manager, _) = build_manager(config(&tmp, Mode::Managed), MemoryFetcher::default());

    let err = manager.available_styles().await.unwrap_err();
    assert!(err.is_network());
}

fn is_dir(path: &Path) -> bool {
    path.is_dir()
}
