//! Typed errors for Vale management operations
//!
//! Path validation never produces these directly: it reports a
//! [`ValidationResult`](crate::validate::ValidationResult) instead. Everything
//! that touches the network, archives or the style directory returns
//! `Result<_, ValeError>` so callers can branch on the failure kind.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the library
pub type Result<T> = std::result::Result<T, ValeError>;

/// Vale management errors with typed variants
///
/// - `NotFound` / `NotExecutable` - a path failed validation
/// - `UnsupportedPlatform` - no Vale release exists for this OS/arch
/// - `DownloadFailure` - the server answered, but not with the archive
/// - `ExtractionFailure` - the archive was unreadable or lacked the binary
/// - `NetworkFailure` - connection, timeout or malformed response body
#[derive(Debug, Error)]
pub enum ValeError {
    /// Path does not exist or is not a regular file
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Path exists but has no execute permission
    #[error("Not executable: {}", .0.display())]
    NotExecutable(PathBuf),

    /// Host OS or architecture has no published Vale release
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Download returned a non-success status or an empty body
    #[error("Download failed for {url}: {reason}")]
    DownloadFailure { url: String, reason: String },

    /// Archive could not be unpacked
    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    /// Connection, timeout or decoding failure
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// Style is not installed or not present in the catalog
    #[error("Style not found: {0}")]
    StyleNotFound(String),

    /// The style ships with Vale and cannot be removed
    #[error("Cannot uninstall built-in style: {0}")]
    BuiltinStyle(String),

    /// Configuration could not be read or written
    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValeError {
    /// Check if this error came from the network layer
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ValeError::NetworkFailure(_) | ValeError::DownloadFailure { .. }
        )
    }

    /// Check if trying again later could plausibly succeed
    ///
    /// Nothing in this crate retries automatically; this is for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            ValeError::NetworkFailure(_) => true,
            ValeError::DownloadFailure { reason, .. } => reason.starts_with("HTTP 5"),
            _ => false,
        }
    }

    /// Convert an HTTP status into a typed download failure
    pub fn from_http_status(url: &str, status: reqwest::StatusCode) -> Self {
        ValeError::DownloadFailure {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        }
    }

    /// Convert network/connection errors into typed ValeError
    pub fn from_network_error(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ValeError::NetworkFailure(format!("Request timeout for {}: {}", url, e))
        } else if e.is_connect() {
            ValeError::NetworkFailure(format!("Connection failed for {}: {}", url, e))
        } else if let Some(status) = e.status() {
            Self::from_http_status(url, status)
        } else {
            ValeError::NetworkFailure(format!("{}: {}", url, e))
        }
    }
}

impl From<zip::result::ZipError> for ValeError {
    fn from(e: zip::result::ZipError) -> Self {
        ValeError::ExtractionFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_retryable() {
        let err = ValeError::NetworkFailure("timeout".to_string());
        assert!(err.is_network());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_http_status_mapping() {
        let err = ValeError::from_http_status("https://x", reqwest::StatusCode::NOT_FOUND);
        assert!(matches!(err, ValeError::DownloadFailure { .. }));
        assert!(err.is_network());
        assert!(!err.is_retryable());

        let err = ValeError::from_http_status("https://x", reqwest::StatusCode::BAD_GATEWAY);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_errors_not_retryable() {
        assert!(!ValeError::NotFound(PathBuf::from("/nope")).is_retryable());
        assert!(!ValeError::UnsupportedPlatform("freebsd".into()).is_network());
    }

    #[test]
    fn test_display_includes_path() {
        let err = ValeError::NotExecutable(PathBuf::from("/usr/bin/vale"));
        assert_eq!(err.to_string(), "Not executable: /usr/bin/vale");
    }
}
