//! vale-config-manager: set up the Vale prose linter
//!
//! This library provides:
//! - Path validation for the Vale binary and `.vale.ini`
//! - Platform-aware download and install of Vale releases
//! - Style catalog lookup with caching
//! - Installed-style resolution for managed and custom setups
//! - `.vale.ini` editing for enabling and disabling styles

pub mod archive;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod installer;
pub mod manager;
pub mod platform;
pub mod styles;
pub mod transport;
pub mod vale_ini;
pub mod validate;

pub use config::{Config, Mode};
pub use errors::{Result, ValeError};
pub use fetch::{Fetcher, HttpFetcher};
pub use installer::BinaryInstaller;
pub use manager::ValeConfigManager;
pub use platform::{Arch, Platform, Target};
pub use styles::{StyleCatalog, StyleRecord, StyleStore};
pub use vale_ini::ValeIni;
pub use validate::{PathValidator, ValidationErrorKind, ValidationResult};
