//! Path validation for the Vale binary and config file

use crate::platform::Platform;
use serde::Serialize;
use std::path::Path;

/// Why a path was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    NotFound,
    NotExecutable,
}

/// Outcome of a single validation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValidationErrorKind>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            kind: None,
        }
    }

    pub fn failed(kind: ValidationErrorKind, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            kind: Some(kind),
        }
    }
}

/// Checks that a path points at a usable file
#[derive(Debug, Clone, Copy)]
pub struct PathValidator {
    check_exec_bit: bool,
}

impl PathValidator {
    /// Validator with the rules of the given platform
    pub fn new(platform: Platform) -> Self {
        Self {
            check_exec_bit: platform.has_exec_bit(),
        }
    }

    /// Validator for the host this process runs on
    pub fn host() -> Self {
        let check_exec_bit = Platform::current()
            .map(|p| p.has_exec_bit())
            .unwrap_or(cfg!(unix));
        Self { check_exec_bit }
    }

    /// Validate an executable path
    ///
    /// Windows does not expose POSIX execute bits reliably, so there a regular
    /// file is enough.
    pub async fn validate(&self, path: &Path) -> ValidationResult {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => {
                tracing::debug!("{} is not a regular file", path.display());
                return ValidationResult::failed(
                    ValidationErrorKind::NotFound,
                    format!("Not a file: {}", path.display()),
                );
            }
            Err(e) => {
                tracing::debug!("stat {} failed: {}", path.display(), e);
                return ValidationResult::failed(
                    ValidationErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                );
            }
        };

        if self.check_exec_bit && !is_executable(&metadata) {
            return ValidationResult::failed(
                ValidationErrorKind::NotExecutable,
                format!("File is not executable: {}", path.display()),
            );
        }

        ValidationResult::ok()
    }

    /// Validate a config file path (existence only)
    pub async fn validate_config(&self, path: &Path) -> ValidationResult {
        match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => ValidationResult::ok(),
            _ => ValidationResult::failed(
                ValidationErrorKind::NotFound,
                format!("Config file not found: {}", path.display()),
            ),
        }
    }
}

impl Default for PathValidator {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}
