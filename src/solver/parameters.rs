//! Parameter pass: record resolved dependencies in the parameter manifests.
//!
//! Manifests are found by walking the tree for the manifest extensions and
//! grouping them by their directory name, the configuration type. Each
//! descriptor lands in the entry named after the config that owns it.

use super::report::PassOutcome;
use super::types::{DependencyDescriptor, DescriptorSet};
use crate::config::Settings;
use crate::core::CfgdepsError;
use crate::manifest::{ParameterChange, ParameterManifest};
use crate::utils::fs::{find_files_by_extension, parent_dir_name};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of the parameter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionSummary {
    /// Manifest files written
    pub manifests_updated: usize,
    /// Parameter entries added or updated
    pub parameters_injected: usize,
}

/// Merges `descriptors` into the parameter manifests below `root`.
///
/// Manifests are only written when their content changes, so running the pass
/// twice with the same descriptors leaves every file as it was.
pub fn inject_parameters(
    root: &Path,
    descriptors: &DescriptorSet,
    settings: &Settings,
) -> PassOutcome<InjectionSummary> {
    let mut summary = InjectionSummary::default();
    if descriptors.is_empty() {
        return PassOutcome::ok(summary);
    }

    let (manifests_by_type, mut errors) = discover_manifests(root, settings);

    for (config_type, pending) in descriptors.iter() {
        let Some(paths) = manifests_by_type.get(config_type) else {
            errors.extend(pending.iter().map(|d| inconsistent(d, "no parameter manifest found")));
            continue;
        };

        let mut manifests = Vec::new();
        let mut unreadable = false;
        for path in paths {
            match ParameterManifest::load(root, path) {
                Ok(manifest) => manifests.push(manifest),
                Err(e) => {
                    unreadable = true;
                    errors.push(e);
                }
            }
        }

        for descriptor in pending {
            let Some(manifest) = manifests.iter_mut().find(|m| m.has_entry(&descriptor.owner_config_name))
            else {
                // The entry may live in the manifest that failed to load.
                if !unreadable {
                    errors.push(inconsistent(descriptor, "no manifest entry for this config"));
                }
                continue;
            };

            match manifest.add_parameter(
                &descriptor.owner_config_name,
                &descriptor.field_name,
                &descriptor.reference_path,
            ) {
                Ok(ParameterChange::Added | ParameterChange::Updated) => summary.parameters_injected += 1,
                Ok(ParameterChange::Unchanged) => {}
                Err(e) => errors.push(inconsistent(descriptor, &e.to_string())),
            }
        }

        for manifest in manifests.iter().filter(|m| m.is_modified()) {
            match manifest.save() {
                Ok(()) => {
                    info!("Updated parameter manifest {}", manifest.relative_path());
                    summary.manifests_updated += 1;
                }
                Err(e) => errors.push(e),
            }
        }
    }

    debug!(
        "Injected {} parameters into {} manifests ({} errors)",
        summary.parameters_injected,
        summary.manifests_updated,
        errors.len()
    );
    PassOutcome {
        value: summary,
        errors,
    }
}

fn discover_manifests(
    root: &Path,
    settings: &Settings,
) -> (BTreeMap<String, Vec<PathBuf>>, Vec<CfgdepsError>) {
    let mut by_type: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let mut errors = Vec::new();

    for entry in find_files_by_extension(root, &settings.manifest_extension_refs()) {
        match entry {
            Ok(path) => {
                if let Some(config_type) = parent_dir_name(&path) {
                    by_type.entry(config_type).or_default().push(path);
                }
            }
            Err(e) => errors.push(CfgdepsError::Read {
                path: e.file_path.clone(),
                reason: e.source.to_string(),
            }),
        }
    }

    (by_type, errors)
}

fn inconsistent(descriptor: &DependencyDescriptor, reason: &str) -> CfgdepsError {
    CfgdepsError::ManifestConsistency {
        config_type: descriptor.owner_config_type.clone(),
        config_name: descriptor.owner_config_name.clone(),
        field: descriptor.field_name.clone(),
        reason: reason.to_string(),
    }
}
