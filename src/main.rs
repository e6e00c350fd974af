//! cfgdeps CLI entry point
//!
//! Parses the command line, runs the selected command, and renders failures as
//! user-friendly errors with suggestions.
//!
//! - `process` - Resolve dependencies in a downloaded tree
//! - `index` - List identifiers without modifying anything
//! - `config` - Show the effective settings

use anyhow::Result;
use cfgdeps_cli::cli;
use cfgdeps_cli::core::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
