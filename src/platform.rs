//! Host platform detection and release asset naming
//!
//! Vale publishes one archive per OS/architecture. Everything that differs
//! between targets (archive format, binary name, asset label) lives in the
//! table below so the rest of the crate matches on [`Platform`] instead of
//! comparing OS strings.

use crate::errors::{Result, ValeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Archive container used by a release asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// File extension used in release asset names
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

/// Operating systems with published Vale releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

/// Per-platform release details
struct ReleaseLayout {
    archive: ArchiveFormat,
    binary_name: &'static str,
    asset_os: &'static str,
}

const WINDOWS: ReleaseLayout = ReleaseLayout {
    archive: ArchiveFormat::Zip,
    binary_name: "vale.exe",
    asset_os: "Windows",
};

const MACOS: ReleaseLayout = ReleaseLayout {
    archive: ArchiveFormat::TarGz,
    binary_name: "vale",
    asset_os: "macOS",
};

const LINUX: ReleaseLayout = ReleaseLayout {
    archive: ArchiveFormat::TarGz,
    binary_name: "vale",
    asset_os: "Linux",
};

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::MacOs, Platform::Linux];

    /// Detect the platform this process runs on
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS` or Node's
    /// `process.platform`) to a platform
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "windows" | "win32" => Ok(Platform::Windows),
            "macos" | "darwin" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(ValeError::UnsupportedPlatform(other.to_string())),
        }
    }

    fn layout(&self) -> &'static ReleaseLayout {
        match self {
            Platform::Windows => &WINDOWS,
            Platform::MacOs => &MACOS,
            Platform::Linux => &LINUX,
        }
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        self.layout().archive
    }

    /// File name of the Vale executable on this platform
    pub fn binary_name(&self) -> &'static str {
        self.layout().binary_name
    }

    /// Whether POSIX execute bits are meaningful on this platform
    pub fn has_exec_bit(&self) -> bool {
        !matches!(self, Platform::Windows)
    }

    /// OS label used in Vale release asset names
    pub fn asset_os(&self) -> &'static str {
        self.layout().asset_os
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

/// CPU architectures with published Vale releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    pub fn current() -> Result<Self> {
        Self::from_arch(std::env::consts::ARCH)
    }

    pub fn from_arch(arch: &str) -> Result<Self> {
        match arch {
            "x86_64" | "x64" => Ok(Arch::X86_64),
            "aarch64" | "arm64" => Ok(Arch::Aarch64),
            other => Err(ValeError::UnsupportedPlatform(format!("{} CPU", other))),
        }
    }

    /// Architecture label used in Vale release asset names
    pub fn asset_arch(&self) -> &'static str {
        match self {
            Arch::X86_64 => "64-bit",
            Arch::Aarch64 => "arm64",
        }
    }
}

/// A fully resolved download target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub platform: Platform,
    pub arch: Arch,
}

impl Target {
    pub fn new(platform: Platform, arch: Arch) -> Self {
        Self { platform, arch }
    }

    pub fn current() -> Result<Self> {
        Ok(Self::new(Platform::current()?, Arch::current()?))
    }

    /// Release asset file name, e.g. `vale_3.7.1_Linux_64-bit.tar.gz`
    pub fn asset_name(&self, version: &str) -> String {
        format!(
            "vale_{}_{}_{}.{}",
            version,
            self.platform.asset_os(),
            self.arch.asset_arch(),
            self.platform.archive_format().extension()
        )
    }
}
