//! Vale styles: records, catalog and installed-style resolution
//!
//! A style is a named rule bundle (Google, Microsoft, ...). The catalog lists
//! the officially published ones with download URLs; everything else found in
//! the styles directory is treated as a custom style.

mod catalog;
mod store;

pub use catalog::{StyleCatalog, DEFAULT_CATALOG_URL};
pub use store::StyleStore;

use crate::config::Mode;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Name of the style bundled with Vale itself
pub const BUILTIN_STYLE: &str = "Vale";

/// Description given to styles that are not in the catalog
pub const CUSTOM_STYLE_DESCRIPTION: &str = "Custom style";

/// A style as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Download URL; present only when the style can be (un)installed from here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StyleRecord {
    /// Record for a style the catalog does not know about
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(CUSTOM_STYLE_DESCRIPTION.to_string()),
            homepage: None,
            url: None,
        }
    }

    /// Copy of a catalog entry with the download URL removed
    fn without_url(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            homepage: self.homepage.clone(),
            url: None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.name == BUILTIN_STYLE
    }
}

/// List returned whenever installed styles cannot be determined
pub fn fallback_styles() -> Vec<StyleRecord> {
    vec![StyleRecord::custom(BUILTIN_STYLE)]
}

fn find<'a>(catalog: &'a [StyleRecord], name: &str) -> Option<&'a StyleRecord> {
    catalog.iter().find(|s| s.name == name)
}

/// Enrich installed style names from the catalog for custom mode
///
/// Matching is exact and case-sensitive. Known styles lose their URL so the
/// view cannot offer to uninstall something the user manages externally.
/// Output order follows `installed`.
pub fn resolve(installed: &[String], catalog: &[StyleRecord]) -> Vec<StyleRecord> {
    installed
        .iter()
        .map(|name| match find(catalog, name) {
            Some(entry) => entry.without_url(),
            None => StyleRecord::custom(name.as_str()),
        })
        .collect()
}

/// Enrich installed style names from the catalog for managed mode
///
/// Same as [`resolve`] except that known styles keep their URL.
pub fn resolve_managed(installed: &[String], catalog: &[StyleRecord]) -> Vec<StyleRecord> {
    installed
        .iter()
        .map(|name| match find(catalog, name) {
            Some(entry) => entry.clone(),
            None => StyleRecord::custom(name.as_str()),
        })
        .collect()
}

/// Load installed names and the catalog, then resolve them for `mode`
///
/// Never fails: if either source errors the result is [`fallback_styles`].
/// The error is logged, not returned, so a broken network or styles
/// directory cannot take down the caller's style list.
pub async fn resolve_installed<I, C>(mode: Mode, installed: I, catalog: C) -> Vec<StyleRecord>
where
    I: Future<Output = Result<Vec<String>>>,
    C: Future<Output = Result<Vec<StyleRecord>>>,
{
    let names = match installed.await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!("Could not list installed styles, using fallback: {}", e);
            return fallback_styles();
        }
    };

    let catalog = match catalog.await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("Could not load style catalog, using fallback: {}", e);
            return fallback_styles();
        }
    };

    match mode {
        Mode::Custom => resolve(&names, &catalog),
        Mode::Managed => resolve_managed(&names, &catalog),
    }
}
