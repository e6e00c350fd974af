//! Reference pass: replace embedded identifiers with template placeholders.
//!
//! Only top-level fields named in [`Settings::reference_fields`] are inspected,
//! and only when their value is a string or a number. A field nested inside an
//! object or array is left exactly as downloaded, even if its name matches.
//!
//! A document is rewritten all-or-nothing: if any of its references cannot be
//! resolved, every unresolved field is reported and the document is left
//! untouched, so no file ends up half templated.

use super::document::ConfigDocument;
use super::report::PassOutcome;
use super::types::{DependencyDescriptor, DescriptorSet, FieldValue, IdentityIndex, IdentityRecord, placeholder};
use crate::api::ApiClassifier;
use crate::config::Settings;
use crate::core::CfgdepsError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Result of the reference pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Descriptors for every resolved reference of an API-backed type
    pub descriptors: DescriptorSet,
    /// Documents written with at least one placeholder
    pub files_rewritten: usize,
    /// Reference values replaced
    pub references_resolved: usize,
}

/// Rewrites resolvable reference fields in `documents` and collects dependency
/// descriptors.
///
/// `documents` are the files below `root` that passed the identity pass
/// ([`IndexedTree::documents`](super::identity::IndexedTree::documents)); the
/// tree is not walked again. `index` must be complete: a document may reference
/// an identifier that is discovered after it in traversal order.
pub fn rewrite_references(
    root: &Path,
    documents: &[PathBuf],
    index: &IdentityIndex,
    settings: &Settings,
    apis: &dyn ApiClassifier,
) -> PassOutcome<RewriteSummary> {
    let mut errors = Vec::new();
    let mut summary = RewriteSummary::default();

    for path in documents {
        match rewrite_document(root, path, index, settings, apis) {
            Ok(Some(descriptors)) => {
                summary.files_rewritten += 1;
                summary.references_resolved += descriptors.resolved;
                summary.descriptors.extend(descriptors.emitted);
            }
            Ok(None) => {}
            Err(mut file_errors) => errors.append(&mut file_errors),
        }
    }

    debug!(
        "Rewrote {} references in {} documents ({} descriptors, {} errors)",
        summary.references_resolved,
        summary.files_rewritten,
        summary.descriptors.len(),
        errors.len()
    );
    PassOutcome {
        value: summary,
        errors,
    }
}

struct DocumentRewrite {
    resolved: usize,
    emitted: Vec<DependencyDescriptor>,
}

fn rewrite_document(
    root: &Path,
    path: &Path,
    index: &IdentityIndex,
    settings: &Settings,
    apis: &dyn ApiClassifier,
) -> Result<Option<DocumentRewrite>, Vec<CfgdepsError>> {
    let mut doc = ConfigDocument::load(root, path).map_err(|e| vec![e])?;

    let mut resolved: Vec<(String, &IdentityRecord)> = Vec::new();
    let mut unresolved = Vec::new();

    for (field, value) in doc.body() {
        if !settings.is_reference_field(field) {
            continue;
        }
        match FieldValue::classify(value) {
            FieldValue::String(text) if text == placeholder(field) => {
                trace!("{}: '{field}' already templated", doc.relative_path());
            }
            FieldValue::Nested | FieldValue::Other => {
                trace!("{}: '{field}' is not a scalar, skipping", doc.relative_path());
            }
            scalar => {
                let Some(id) = scalar.scalar_text() else {
                    continue;
                };
                match index.get(&id) {
                    Some(record) => resolved.push((field.clone(), record)),
                    None => unresolved.push(CfgdepsError::UnresolvedDependency {
                        config_type: doc.config_type().to_string(),
                        field: field.clone(),
                        value: id.into_owned(),
                        path: PathBuf::from(doc.relative_path()),
                    }),
                }
            }
        }
    }

    if !unresolved.is_empty() {
        debug!("Leaving {} unchanged: {} unresolved references", doc.relative_path(), unresolved.len());
        return Err(unresolved);
    }
    if resolved.is_empty() {
        return Ok(None);
    }

    let api_backed = apis.is_api_backed(doc.config_type());
    let mut emitted = Vec::new();
    for (field, record) in &resolved {
        doc.body_mut().insert(field.clone(), Value::String(placeholder(field)));
        if api_backed {
            emitted.push(DependencyDescriptor {
                field_name: field.clone(),
                reference_path: record
                    .reference_path(&settings.document_extension, &settings.identifier_extension),
                owner_config_type: doc.config_type().to_string(),
                owner_config_name: doc.file_stem().to_string(),
            });
        }
    }

    doc.save().map_err(|e| vec![e])?;
    trace!("{}: {} references templated", doc.relative_path(), resolved.len());

    Ok(Some(DocumentRewrite {
        resolved: resolved.len(),
        emitted,
    }))
}
