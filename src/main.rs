use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vale_config_manager::{transport, Config, Mode};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    env!("VALE_CONFIG_VERSION_SUFFIX"),
    " (",
    env!("VALE_CONFIG_GIT_HASH"),
    ")"
);

#[derive(Parser)]
#[command(name = "vale-config", author, version, long_version = LONG_VERSION)]
#[command(about = "vale-config - install and configure the Vale prose linter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective mode, binary, config and styles paths
    Paths {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Validate the Vale binary and config file
    Validate {
        /// Vale binary to check instead of the configured one
        #[arg(long)]
        vale: Option<PathBuf>,

        /// Config file to check instead of the configured one
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Download and install the Vale binary (managed mode)
    Install {
        /// Log download/extraction failures instead of failing
        #[arg(long)]
        best_effort: bool,
    },

    /// List installed styles
    Styles {
        /// List every style in the remote catalog instead
        #[arg(short, long)]
        available: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Manage a single style
    Style {
        #[command(subcommand)]
        action: StyleAction,
    },

    /// Switch between managed and custom mode
    Mode {
        mode: Mode,

        /// Vale binary to use in custom mode
        #[arg(long)]
        vale_path: Option<PathBuf>,

        /// .vale.ini to use in custom mode
        #[arg(long)]
        config_path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StyleAction {
    /// Download a catalog style and enable it
    Install { name: String },
    /// Remove an installed style and disable it
    Uninstall { name: String },
    /// Add a style to BasedOnStyles
    Enable { name: String },
    /// Remove a style from BasedOnStyles
    Disable { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "vale_config_manager=debug"
    } else {
        "vale_config_manager=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    tracing::debug!("Loaded config: mode={}", config.mode);

    match cli.command {
        Commands::Paths { format } => {
            transport::cli::run_paths(config, &format).await?;
        }
        Commands::Validate {
            vale,
            config: config_file,
            format,
        } => {
            transport::cli::run_validate(config, vale, config_file, &format).await?;
        }
        Commands::Install { best_effort } => {
            transport::cli::run_install(config, best_effort).await?;
        }
        Commands::Styles { available, format } => {
            transport::cli::run_styles(config, available, &format).await?;
        }
        Commands::Style { action } => match action {
            StyleAction::Install { name } => {
                transport::cli::run_style_install(config, &name).await?;
            }
            StyleAction::Uninstall { name } => {
                transport::cli::run_style_uninstall(config, &name).await?;
            }
            StyleAction::Enable { name } => {
                transport::cli::run_style_toggle(config, &name, true).await?;
            }
            StyleAction::Disable { name } => {
                transport::cli::run_style_toggle(config, &name, false).await?;
            }
        },
        Commands::Mode {
            mode,
            vale_path,
            config_path,
        } => {
            transport::cli::run_mode(config, mode, vale_path, config_path)?;
        }
    }

    Ok(())
}
