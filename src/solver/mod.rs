//! Dependency resolution for downloaded configuration trees.
//!
//! A freshly downloaded environment holds one JSON document per configuration,
//! grouped by type directory. Configurations reference each other through
//! identifiers that only mean something in the environment they came from. This
//! module turns those references into template parameters in three passes:
//!
//! 1. [`build_identity_index`]: record which document holds which identifier,
//!    then strip the identifier from the document
//! 2. [`rewrite_references`]: replace every resolvable reference field with a
//!    `{{.<field>}}` placeholder and describe the dependency
//! 3. [`inject_parameters`]: add each dependency to the owning type's parameter
//!    manifest as `<field>: <type>/<name>.id`
//!
//! Each pass fully completes before the next starts. Per-file failures never
//! abort a pass; they are collected and returned together by
//! [`process_downloaded_files`]. A document that failed a pass is not seen by
//! the passes after it.
//!
//! # Example
//!
//! Given
//!
//! ```text
//! management-zone/zoneA.json          {"id": "Z1", "name": "A"}
//! alerting-profile/profileA.json      {"id": "P1", "name": "P", "mzId": "Z1"}
//! alerting-profile/alerting-profile.yaml
//!     profileA:
//!     - name: P
//! ```
//!
//! a run strips `id` from both documents, sets `profileA.json`'s `mzId` to
//! `"{{.mzId}}"` and appends `- mzId: management-zone/zoneA.id` to `profileA`.
//!
//! ```rust,no_run
//! use cfgdeps_cli::api::KnownApis;
//! use cfgdeps_cli::config::Settings;
//! use cfgdeps_cli::solver::process_downloaded_files;
//! use std::path::Path;
//!
//! let settings = Settings::default();
//! let apis = KnownApis::from_settings(&settings);
//! match process_downloaded_files(Path::new("download/prod"), &settings, &apis) {
//!     Ok(report) => println!("{report}"),
//!     Err(e) => {
//!         for (pass, error) in &e.errors {
//!             eprintln!("[{pass}] {error}");
//!         }
//!     }
//! }
//! ```

mod document;
pub mod identity;
pub mod parameters;
pub mod references;
mod report;
mod types;

pub use document::{ConfigDocument, discover_documents};
pub use identity::{IndexedTree, build_identity_index, scan_identities};
pub use parameters::{InjectionSummary, inject_parameters};
pub use references::{RewriteSummary, rewrite_references};
pub use report::{Pass, PassOutcome, ProcessError, ProcessReport};
pub use types::{
    DependencyDescriptor, DescriptorSet, FieldValue, IdentifierCollision, IdentityIndex, IdentityRecord,
    placeholder,
};

use crate::api::ApiClassifier;
use crate::config::Settings;
use crate::core::CfgdepsError;
use std::path::Path;
use tracing::{debug, info};

/// Runs all three passes over `root`.
///
/// # Errors
///
/// Returns [`ProcessError`] if any pass recorded an error. It carries every
/// error of every pass together with the report of what was still done. A root
/// that is not a directory fails with a single [`CfgdepsError::InvalidRoot`]
/// before anything is read.
pub fn process_downloaded_files(
    root: &Path,
    settings: &Settings,
    apis: &dyn ApiClassifier,
) -> Result<ProcessReport, ProcessError> {
    let root_display = root.display().to_string();

    if !root.is_dir() {
        return Err(ProcessError {
            root: root_display,
            errors: vec![(
                Pass::Identity,
                CfgdepsError::InvalidRoot {
                    path: root.to_path_buf(),
                },
            )],
            report: ProcessReport::default(),
        });
    }

    info!("Resolving dependencies in {root_display}");
    let mut errors = Vec::new();
    let mut report = ProcessReport::default();

    let identity = build_identity_index(root, settings);
    collect(&mut errors, Pass::Identity, identity.errors);
    let IndexedTree {
        index,
        documents,
    } = identity.value;
    report.files_indexed = index.len() + index.collisions().len();
    report.collisions = index.collisions().to_vec();

    let rewrites = rewrite_references(root, &documents, &index, settings, apis);
    collect(&mut errors, Pass::References, rewrites.errors);
    report.files_rewritten = rewrites.value.files_rewritten;
    report.references_resolved = rewrites.value.references_resolved;

    let injection = inject_parameters(root, &rewrites.value.descriptors, settings);
    collect(&mut errors, Pass::Parameters, injection.errors);
    report.manifests_updated = injection.value.manifests_updated;
    report.parameters_injected = injection.value.parameters_injected;

    info!("{root_display}: {report}");

    if errors.is_empty() {
        Ok(report)
    } else {
        for (pass, e) in &errors {
            debug!("[{pass}] {e}");
        }
        Err(ProcessError {
            root: root_display,
            errors,
            report,
        })
    }
}

fn collect(into: &mut Vec<(Pass, CfgdepsError)>, pass: Pass, errors: Vec<CfgdepsError>) {
    into.extend(errors.into_iter().map(|e| (pass, e)));
}
