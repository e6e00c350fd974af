//! List which document holds which identifier.
//!
//! Runs the identity extraction without writing anything back, which is useful
//! to check a download for missing identifiers or collisions before processing
//! it.
//!
//! # Examples
//!
//! ```bash
//! cfgdeps index download/prod
//! cfgdeps index download/prod --format json | jq '.collisions'
//! ```

use crate::config::Settings;
use crate::core::CfgdepsError;
use crate::solver::{IdentifierCollision, IdentityRecord, scan_identities};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Output format of `cfgdeps index`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned, colored listing
    #[default]
    Text,
    /// One JSON document on stdout
    Json,
}

/// Arguments of `cfgdeps index`.
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Downloaded tree to scan
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct IndexListing<'a> {
    identifiers: Vec<&'a IdentityRecord>,
    collisions: &'a [IdentifierCollision],
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorEntry {
    kind: &'static str,
    message: String,
}

impl IndexCommand {
    /// Scan the tree and print the listing.
    ///
    /// Fails after printing if any document could not be indexed.
    pub async fn execute(self, settings: Settings) -> Result<()> {
        if !self.path.is_dir() {
            return Err(CfgdepsError::InvalidRoot {
                path: self.path,
            }
            .into());
        }

        let root = self.path.clone();
        let outcome = tokio::task::spawn_blocking(move || scan_identities(&root, &settings))
            .await
            .context("Identifier scan did not complete")?;

        let listing = IndexListing {
            identifiers: outcome.value.iter().collect(),
            collisions: outcome.value.collisions(),
            errors: outcome
                .errors
                .iter()
                .map(|e| ErrorEntry {
                    kind: e.kind(),
                    message: e.to_string(),
                })
                .collect(),
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
            OutputFormat::Text => print_text(&listing),
        }

        if listing.errors.is_empty() {
            Ok(())
        } else {
            Err(CfgdepsError::Other {
                message: format!(
                    "{} document(s) in {} could not be indexed",
                    listing.errors.len(),
                    self.path.display()
                ),
            }
            .into())
        }
    }
}

fn print_text(listing: &IndexListing<'_>) {
    if listing.identifiers.is_empty() {
        println!("No identifiers found");
    }

    let width = listing.identifiers.iter().map(|r| r.id.len()).max().unwrap_or(0);
    for record in &listing.identifiers {
        println!("{}  {}", format!("{:<width$}", record.id).cyan(), record.relative_path);
    }

    for collision in listing.collisions {
        println!(
            "{} {} is also held by {} (shadowed)",
            "⚠".yellow(),
            collision.id.bold(),
            collision.replaced
        );
    }

    for entry in &listing.errors {
        eprintln!("{} {}", "✗".red(), entry.message);
    }
}
