//! CLI command handlers

use crate::config::{Config, Mode};
use crate::manager::ValeConfigManager;
use crate::styles::StyleRecord;
use crate::validate::{PathValidator, ValidationResult};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

fn manager(config: Config) -> Result<ValeConfigManager> {
    ValeConfigManager::new(config).context("Failed to initialize Vale config manager")
}

fn display_path(path: crate::errors::Result<PathBuf>) -> String {
    match path {
        Ok(p) => p.display().to_string(),
        Err(e) => format!("<{}>", e),
    }
}

/// Show the effective mode and paths
pub async fn run_paths(config: Config, format: &str) -> Result<()> {
    let manager = manager(config)?;
    let vale = display_path(manager.vale_path());
    let config_file = display_path(manager.config_path());
    let styles = display_path(manager.styles_path().await);

    match format {
        "json" => {
            let output = serde_json::json!({
                "mode": manager.mode(),
                "vale_path": vale,
                "config_path": config_file,
                "styles_path": styles,
                "vale_path_exists": manager.vale_path_exists().await,
                "config_path_exists": manager.config_path_exists().await,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("{}", "=== Vale Paths ===".bold().cyan());
            println!();
            println!("{}:    {}", "Mode".bold(), manager.mode());
            println!("{}:    {}", "Vale".bold(), vale);
            println!("{}:  {}", "Config".bold(), config_file);
            println!("{}:  {}", "Styles".bold(), styles);
        }
    }

    Ok(())
}

fn print_validation(label: &str, path: &str, result: &ValidationResult) {
    if result.valid {
        println!("{} {}: {}", "✓".green(), label.bold(), path);
    } else {
        println!(
            "{} {}: {}",
            "✗".red(),
            label.bold(),
            result.error.as_deref().unwrap_or("invalid")
        );
    }
}

/// Validate the Vale binary and config paths
///
/// Explicit paths are checked as given; otherwise the configured ones are used.
pub async fn run_validate(
    config: Config,
    vale: Option<PathBuf>,
    config_file: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let validator = PathValidator::host();
    let (vale_result, vale_label, config_result, config_label) =
        if vale.is_some() || config_file.is_some() {
            let vale_result = match vale.as_deref() {
                Some(p) => Some(validator.validate(p).await),
                None => None,
            };
            let config_result = match config_file.as_deref() {
                Some(p) => Some(validator.validate_config(p).await),
                None => None,
            };
            (
                vale_result,
                vale.map(|p| p.display().to_string()),
                config_result,
                config_file.map(|p| p.display().to_string()),
            )
        } else {
            let manager = manager(config)?;
            (
                Some(manager.validate_vale_path().await),
                Some(display_path(manager.vale_path())),
                Some(manager.validate_config_path().await),
                Some(display_path(manager.config_path())),
            )
        };

    match format {
        "json" => {
            let output = serde_json::json!({
                "vale": vale_result,
                "config": config_result,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            if let (Some(result), Some(path)) = (&vale_result, &vale_label) {
                print_validation("Vale", path, result);
            }
            if let (Some(result), Some(path)) = (&config_result, &config_label) {
                print_validation("Config", path, result);
            }
        }
    }

    let all_valid = [vale_result, config_result]
        .iter()
        .flatten()
        .all(|r| r.valid);
    if !all_valid {
        anyhow::bail!("Validation failed");
    }
    Ok(())
}

/// Download and install the Vale binary
pub async fn run_install(config: Config, best_effort: bool) -> Result<()> {
    let manager = manager(config)?;
    let path = manager
        .install_vale(best_effort)
        .await
        .context("Failed to install Vale")?;

    if best_effort && !manager.validate_vale_path().await.valid {
        println!(
            "{} Install reported {} but the binary is not usable",
            "⚠".yellow(),
            path.display()
        );
    } else {
        println!("{} Vale installed at {}", "✓".green(), path.display());
    }
    Ok(())
}

#[derive(Tabled)]
struct StyleRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Homepage")]
    homepage: String,
}

fn style_rows(styles: &[StyleRecord], enabled: &[String]) -> Vec<StyleRow> {
    styles
        .iter()
        .map(|s| StyleRow {
            name: s.name.clone(),
            enabled: if enabled.contains(&s.name) {
                "✓".green().to_string()
            } else {
                String::new()
            },
            description: s
                .description
                .as_deref()
                .unwrap_or("")
                .chars()
                .take(60)
                .collect(),
            homepage: s.homepage.clone().unwrap_or_default(),
        })
        .collect()
}

/// List installed (or catalog) styles
pub async fn run_styles(config: Config, available: bool, format: &str) -> Result<()> {
    let manager = manager(config)?;

    let styles = if available {
        manager
            .available_styles()
            .await
            .context("Failed to fetch style catalog")?
    } else {
        manager.installed_styles().await
    };
    let enabled = manager.enabled_styles().await.unwrap_or_default();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&styles)?),
        _ => {
            let title = if available {
                "=== Available Styles ==="
            } else {
                "=== Installed Styles ==="
            };
            println!("{}", title.bold().cyan());
            println!();
            let mut table = Table::new(style_rows(&styles, &enabled));
            table.with(Style::rounded());
            println!("{}", table);
        }
    }
    Ok(())
}

pub async fn run_style_install(config: Config, name: &str) -> Result<()> {
    let dir = manager(config)?
        .install_style(name)
        .await
        .with_context(|| format!("Failed to install style '{}'", name))?;
    println!(
        "{} Installed {} to {}",
        "✓".green(),
        name.bold(),
        dir.display()
    );
    Ok(())
}

pub async fn run_style_uninstall(config: Config, name: &str) -> Result<()> {
    manager(config)?
        .uninstall_style(name)
        .await
        .with_context(|| format!("Failed to uninstall style '{}'", name))?;
    println!("{} Removed {}", "✓".green(), name.bold());
    Ok(())
}

pub async fn run_style_toggle(config: Config, name: &str, enable: bool) -> Result<()> {
    let manager = manager(config)?;
    let changed = if enable {
        manager.enable_style(name).await?
    } else {
        manager.disable_style(name).await?
    };

    let state = if enable { "enabled" } else { "disabled" };
    if changed {
        println!("{} {} {}", "✓".green(), name.bold(), state);
    } else {
        println!("{} is already {}", name.bold(), state);
    }
    Ok(())
}

/// Persist the mode (and custom paths) to the config file
pub fn run_mode(
    mut config: Config,
    mode: Mode,
    vale_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    config.mode = mode;
    if vale_path.is_some() {
        config.custom.vale_path = vale_path;
    }
    if config_path.is_some() {
        config.custom.config_path = config_path;
    }
    config.save().context("Failed to save configuration")?;

    println!(
        "{} Mode set to {} ({})",
        "✓".green(),
        mode.to_string().bold(),
        Config::config_path()?.display()
    );
    Ok(())
}
