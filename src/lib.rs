//! cfgdeps - dependency resolution for downloaded monitoring configuration
//!
//! Configuration downloaded from a monitoring environment references other
//! configuration by identifiers the source environment assigned. Those
//! identifiers change when the configuration is deployed elsewhere, so a
//! downloaded tree cannot be applied to another environment as-is. cfgdeps turns
//! such a tree into templates: identifiers are stripped, references become
//! `{{.<field>}}` placeholders, and each dependency is recorded as a path-based
//! parameter in the owning type's manifest.
//!
//! # Architecture Overview
//!
//! A downloaded environment looks like
//!
//! ```text
//! <root>/
//!   management-zone/
//!     management-zone.yaml       parameter manifest
//!     zoneA.json                 {"id": "Z1", ...}
//!   alerting-profile/
//!     alerting-profile.yaml
//!     profileA.json              {"id": "P7", "mzId": "Z1", ...}
//! ```
//!
//! and is processed by three passes with a hard barrier between them:
//! identity indexing, reference rewriting, and parameter injection. See
//! [`solver`] for the details.
//!
//! # Core Modules
//!
//! - [`solver`] - The three passes and [`solver::process_downloaded_files`]
//! - [`manifest`] - Reading and updating YAML parameter manifests
//! - [`api`] - Which configuration types are API-backed
//! - [`config`] - Engine settings (`cfgdeps.toml`)
//! - [`core`] - Error types and user-facing error reporting
//! - [`utils`] - Deterministic file discovery, atomic writes, path helpers
//! - [`cli`] - The `cfgdeps` command line
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Process one downloaded environment
//! cfgdeps process download/prod
//!
//! # Process several environments below one download directory
//! cfgdeps process download -e prod -e staging
//!
//! # Re-run on a tree that was already processed
//! cfgdeps process download/prod --rerun
//!
//! # Check identifiers without changing anything
//! cfgdeps index download/prod --format json
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use cfgdeps_cli::api::KnownApis;
//! use cfgdeps_cli::config::Settings;
//! use cfgdeps_cli::solver::process_downloaded_files;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::load_with_optional(None).await?;
//! let apis = KnownApis::from_settings(&settings);
//! let report = process_downloaded_files(Path::new("download/prod"), &settings, &apis)?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod core;
pub mod solver;

// Configuration files
pub mod api;
pub mod manifest;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
