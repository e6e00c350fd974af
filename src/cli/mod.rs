//! Command-line interface for cfgdeps.
//!
//! # Commands
//!
//! - `process`: resolve dependencies in a downloaded tree (one or more environments)
//! - `index`: list which document holds which identifier, without modifying anything
//! - `config`: show the effective settings and where they were looked up
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: errors only
//! - `--config` / `-c`: settings file to use instead of the usual search
//!
//! `RUST_LOG`, when set, overrides the level chosen by `--verbose` / `--quiet`.
//! Logs go to stderr so command output on stdout stays machine readable.
//!
//! # Examples
//!
//! ```bash
//! cfgdeps process download/ --environment prod --environment staging
//! cfgdeps index download/prod --format json
//! cfgdeps --config team.toml config show
//! ```

mod config;
mod index;
mod process;

pub use index::OutputFormat;

use crate::config::Settings;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from global flags, shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `RUST_LOG` takes precedence
    pub log_level: String,

    /// Settings file given with `--config`
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber.
    ///
    /// Does nothing if a subscriber is already set (e.g. in tests).
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load [`Settings`] honoring `--config`.
    pub async fn load_settings(&self) -> Result<Settings> {
        Settings::load_with_optional(self.config_path.clone()).await
    }
}

/// Resolve cross-configuration dependencies in downloaded monitoring configuration.
#[derive(Parser)]
#[command(
    name = "cfgdeps",
    about = "Turn downloaded monitoring configuration into environment-independent templates",
    version,
    long_about = "cfgdeps replaces identifier references between downloaded configurations with \
                  template placeholders and records each dependency in the owning type's parameter manifest."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file (default: $CFGDEPS_CONFIG, ./cfgdeps.toml, then the user config dir)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve dependencies in a downloaded tree
    Process(process::ProcessCommand),

    /// List identifiers found in a downloaded tree (read-only)
    Index(index::IndexCommand),

    /// Inspect settings
    Config(config::ConfigCommand),
}

impl Cli {
    /// Run the parsed command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
        }
    }

    /// Run the parsed command with an explicit [`CliConfig`].
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Process(cmd) => {
                let settings = config.load_settings().await?;
                cmd.execute(settings).await
            }
            Commands::Index(cmd) => {
                let settings = config.load_settings().await?;
                cmd.execute(settings).await
            }
            Commands::Config(cmd) => cmd.execute(config.config_path).await,
        }
    }
}
