//! Inspect the settings cfgdeps runs with.
//!
//! # Examples
//!
//! ```bash
//! cfgdeps config            # same as `config show`
//! cfgdeps config show
//! cfgdeps config path
//! ```

use crate::api::KnownApis;
use crate::config::{CONFIG_ENV_VAR, Settings};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

/// Arguments of `cfgdeps config`.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Print the effective settings as TOML
    Show,

    /// Print where settings are looked up
    Path,
}

impl ConfigCommand {
    /// Execute the config command.
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Show) | None => Self::show(config_path).await,
            Some(ConfigSubcommands::Path) => {
                Self::show_path(config_path);
                Ok(())
            }
        }
    }

    async fn show(config_path: Option<PathBuf>) -> Result<()> {
        let settings = Settings::load_with_optional(config_path).await?;
        let rendered = toml::to_string_pretty(&settings).context("Failed to render settings")?;
        print!("{rendered}");

        let apis = KnownApis::from_settings(&settings);
        println!("\n# API-backed types (receive manifest parameters):");
        for id in apis.ids() {
            println!("#   {id}");
        }
        Ok(())
    }

    fn show_path(config_path: Option<PathBuf>) {
        if let Some(path) = config_path {
            println!("{} {}", "--config:".bold(), path.display());
            return;
        }

        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => println!("{} {path}", format!("${CONFIG_ENV_VAR}:").bold()),
            _ => {
                for candidate in Settings::search_paths() {
                    let marker = if candidate.exists() {
                        "✓".green()
                    } else {
                        "-".dimmed()
                    };
                    println!("{marker} {}", candidate.display());
                }
            }
        }
    }
}
