//! Resolve dependencies in one or more downloaded environments.
//!
//! Without `--environment` the given path is processed as a single downloaded
//! environment. With one or more `--environment NAME`, each `PATH/NAME` is
//! processed on its own; a failure in one environment does not stop the
//! others, but makes the command fail once all of them ran.
//!
//! # Examples
//!
//! ```bash
//! cfgdeps process download/prod
//! cfgdeps process download --environment prod --environment staging
//! cfgdeps process download/prod --rerun
//! ```

use crate::api::KnownApis;
use crate::config::Settings;
use crate::core::CfgdepsError;
use crate::solver::{Pass, ProcessError, ProcessReport, process_downloaded_files};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

/// Arguments of `cfgdeps process`.
#[derive(Args, Debug)]
pub struct ProcessCommand {
    /// Downloaded tree, or the directory holding one tree per environment
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Process `PATH/NAME`; may be repeated
    #[arg(short, long = "environment", value_name = "NAME")]
    environments: Vec<String>,

    /// The tree was already processed; skip documents whose identifier is gone
    #[arg(long)]
    rerun: bool,
}

impl ProcessCommand {
    /// Run the engine over every target and print a summary per target.
    pub async fn execute(self, mut settings: Settings) -> Result<()> {
        if self.rerun {
            settings.allow_stripped_identifiers = true;
        }

        let apis = Arc::new(KnownApis::from_settings(&settings));
        let settings = Arc::new(settings);
        let targets = self.targets();
        let total = targets.len();
        let mut failures: Vec<ProcessError> = Vec::new();

        for root in targets {
            debug!("Processing {}", root.display());
            let settings = Arc::clone(&settings);
            let apis = Arc::clone(&apis);
            let task_root = root.clone();

            let result = tokio::task::spawn_blocking(move || {
                process_downloaded_files(&task_root, &settings, &*apis)
            })
            .await
            .with_context(|| format!("Dependency resolution for {} did not complete", root.display()))?;

            match result {
                Ok(report) => print_success(&root.display().to_string(), &report),
                Err(e) => {
                    print_failure(&e);
                    failures.push(e);
                }
            }
        }

        match failures.as_slice() {
            [] => Ok(()),
            [single] if total == 1 && single.errors.len() == 1 => {
                Err(single.errors[0].1.clone().into())
            }
            _ => Err(CfgdepsError::Other {
                message: format!(
                    "Dependency resolution failed for {} of {total} download(s): {}",
                    failures.len(),
                    failures.iter().map(|f| f.root.as_str()).collect::<Vec<_>>().join(", ")
                ),
            }
            .into()),
        }
    }

    fn targets(&self) -> Vec<PathBuf> {
        if self.environments.is_empty() {
            vec![self.path.clone()]
        } else {
            self.environments.iter().map(|env| self.path.join(env)).collect()
        }
    }
}

fn print_success(label: &str, report: &ProcessReport) {
    println!("{} {}: {}", "✓".green(), label.bold(), report);
    for collision in &report.collisions {
        println!(
            "  {} identifier {} of {} was overwritten by {}",
            "⚠".yellow(),
            collision.id,
            collision.replaced,
            collision.kept
        );
    }
}

fn print_failure(failure: &ProcessError) {
    let by_pass: Vec<String> = [Pass::Identity, Pass::References, Pass::Parameters]
        .into_iter()
        .filter_map(|pass| {
            let count = failure.errors_in(pass).count();
            (count > 0).then(|| format!("{count} in {pass}"))
        })
        .collect();

    for (pass, e) in &failure.errors {
        error!("[{pass}] {e}");
    }
    eprintln!("{} {}: {} ({})", "✗".red(), failure.root.bold(), failure, by_pass.join(", "));
    eprintln!("  {}", failure.report.to_string().dimmed());
}
