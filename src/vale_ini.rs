//! Minimal `.vale.ini` reader/editor
//!
//! Only the keys this crate needs are interpreted (`StylesPath` and
//! `[*] BasedOnStyles`). Every other line is kept verbatim so edits do not
//! reformat the user's file.

use crate::errors::Result;
use std::fmt;
use std::path::{Path, PathBuf};

const ALL_FILES_SECTION: &str = "*";

/// Parsed `.vale.ini` contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValeIni {
    lines: Vec<String>,
}

enum Line<'a> {
    Section(&'a str),
    Entry(&'a str, &'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
        return Line::Other;
    }
    if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return Line::Section(name.trim());
    }
    match trimmed.split_once('=') {
        Some((key, value)) => Line::Entry(key.trim(), value.trim()),
        None => Line::Other,
    }
}

impl ValeIni {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
        }
    }

    /// Config written for a fresh managed install
    pub fn managed_default() -> Self {
        Self::parse("StylesPath = styles\n\n[*]\nBasedOnStyles = Vale\n")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::parse(&content))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.to_string()).await?;
        tracing::debug!("Saved Vale config to {}", path.display());
        Ok(())
    }

    /// Index of the line holding `key` in `section` (`None` = global)
    fn find(&self, section: Option<&str>, key: &str) -> Option<usize> {
        let mut current: Option<&str> = None;
        for (i, line) in self.lines.iter().enumerate() {
            match classify(line) {
                Line::Section(name) => current = Some(name),
                Line::Entry(k, _) if current == section && k == key => return Some(i),
                _ => {}
            }
        }
        None
    }

    /// Index of the `[section]` header line
    fn find_section(&self, section: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| matches!(classify(l), Line::Section(name) if name == section))
    }

    /// Index just past the last line belonging to `[section]`
    fn section_end(&self, header: usize) -> usize {
        let mut end = header + 1;
        for (i, line) in self.lines.iter().enumerate().skip(header + 1) {
            match classify(line) {
                Line::Section(_) => break,
                Line::Entry(..) => end = i + 1,
                Line::Other => {}
            }
        }
        end
    }

    pub fn get(&self, section: Option<&str>, key: &str) -> Option<String> {
        let i = self.find(section, key)?;
        match classify(&self.lines[i]) {
            Line::Entry(_, value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, section: Option<&str>, key: &str, value: &str) {
        let line = format!("{} = {}", key, value);

        if let Some(i) = self.find(section, key) {
            self.lines[i] = line;
            return;
        }

        match section {
            None => {
                let end = self
                    .lines
                    .iter()
                    .position(|l| matches!(classify(l), Line::Section(_)))
                    .unwrap_or(self.lines.len());
                self.lines.insert(end, line);
            }
            Some(name) => match self.find_section(name) {
                Some(header) => {
                    let end = self.section_end(header);
                    self.lines.insert(end, line);
                }
                None => {
                    if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
                        self.lines.push(String::new());
                    }
                    self.lines.push(format!("[{}]", name));
                    self.lines.push(line);
                }
            },
        }
    }

    /// Raw `StylesPath` value
    pub fn styles_path(&self) -> Option<String> {
        self.get(None, "StylesPath")
    }

    /// `StylesPath` resolved against the directory holding the config file
    pub fn resolved_styles_path(&self, config_path: &Path) -> Option<PathBuf> {
        let raw = PathBuf::from(self.styles_path()?);
        if raw.is_absolute() {
            return Some(raw);
        }
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        Some(base.join(raw))
    }

    /// Styles listed in `[*] BasedOnStyles`
    pub fn enabled_styles(&self) -> Vec<String> {
        self.get(Some(ALL_FILES_SECTION), "BasedOnStyles")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_enabled_styles(&mut self, styles: &[String]) {
        self.set(Some(ALL_FILES_SECTION), "BasedOnStyles", &styles.join(", "));
    }

    /// Add a style to `BasedOnStyles`; returns false if it was already there
    pub fn enable_style(&mut self, name: &str) -> bool {
        let mut styles = self.enabled_styles();
        if styles.iter().any(|s| s == name) {
            return false;
        }
        styles.push(name.to_string());
        self.set_enabled_styles(&styles);
        true
    }

    /// Remove a style from `BasedOnStyles`; returns false if it was not there
    pub fn disable_style(&mut self, name: &str) -> bool {
        let mut styles = self.enabled_styles();
        let before = styles.len();
        styles.retain(|s| s != name);
        if styles.len() == before {
            return false;
        }
        self.set_enabled_styles(&styles);
        true
    }
}

impl fmt::Display for ValeIni {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
