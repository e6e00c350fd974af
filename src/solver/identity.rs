//! Identity pass: which document holds which identifier.
//!
//! [`build_identity_index`] records every document's identifier and strips the
//! identifier field so the document no longer depends on the environment it was
//! downloaded from. [`scan_identities`] performs the same extraction without
//! touching any file.
//!
//! Only documents that made it through this pass are handed on to the reference
//! pass, listed in [`IndexedTree::documents`].

use super::document::{ConfigDocument, discover_documents};
use super::report::PassOutcome;
use super::types::{FieldValue, IdentityIndex, IdentityRecord};
use crate::config::Settings;
use crate::core::CfgdepsError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What the identity pass leaves for the later passes.
#[derive(Debug, Clone, Default)]
pub struct IndexedTree {
    /// Identifier to owning document
    pub index: IdentityIndex,
    /// Documents that were indexed, or skipped as already processed, in walk order
    pub documents: Vec<PathBuf>,
}

/// Builds the identifier index and strips identifier fields on disk.
///
/// Documents that fail to load, lack an identifier, or cannot be written back
/// are recorded as errors and left out of both the index and
/// [`IndexedTree::documents`]; the pass continues with the next document.
///
/// With [`Settings::allow_stripped_identifiers`] set, documents without an
/// identifier field are treated as output of an earlier run. They are not
/// indexed but still listed, so references added to them since are resolved.
pub fn build_identity_index(root: &Path, settings: &Settings) -> PassOutcome<IndexedTree> {
    index_tree(root, settings, true)
}

/// Builds the identifier index without modifying any document.
pub fn scan_identities(root: &Path, settings: &Settings) -> PassOutcome<IdentityIndex> {
    let outcome = index_tree(root, settings, false);
    PassOutcome {
        value: outcome.value.index,
        errors: outcome.errors,
    }
}

fn index_tree(root: &Path, settings: &Settings, strip: bool) -> PassOutcome<IndexedTree> {
    let (paths, mut errors) = discover_documents(root, settings);
    let mut index = IdentityIndex::new();
    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        match index_document(root, &path, settings, strip) {
            Ok(Some(record)) => {
                documents.push(path);
                if let Some(previous) = index.insert(record.clone())
                    && previous.relative_path != record.relative_path
                {
                    warn!(
                        "Identifier {} of {} also belongs to {}; keeping {}",
                        record.id, previous.relative_path, record.relative_path, record.relative_path
                    );
                }
            }
            Ok(None) => documents.push(path),
            Err(e) => {
                debug!("Skipping {}: {e}", path.display());
                errors.push(e);
            }
        }
    }

    debug!("Indexed {} identifiers with {} errors", index.len(), errors.len());
    PassOutcome {
        value: IndexedTree {
            index,
            documents,
        },
        errors,
    }
}

fn index_document(
    root: &Path,
    path: &Path,
    settings: &Settings,
    strip: bool,
) -> Result<Option<IdentityRecord>, CfgdepsError> {
    let mut doc = ConfigDocument::load(root, path)?;
    let field = settings.identifier_field_for(doc.relative_path()).to_string();

    let Some(value) = doc.body().get(&field) else {
        if settings.allow_stripped_identifiers {
            debug!("{} has no '{field}' field, assuming it was already processed", doc.relative_path());
            return Ok(None);
        }
        return Err(missing(&doc, &field, "field is absent"));
    };

    let id = match FieldValue::classify(value).scalar_text() {
        Some(text) if !text.is_empty() => text.into_owned(),
        Some(_) => return Err(missing(&doc, &field, "value is empty")),
        None => return Err(missing(&doc, &field, "expected a string or number")),
    };

    if strip {
        doc.body_mut().remove(&field);
        doc.save()?;
    }

    Ok(Some(IdentityRecord {
        id,
        file_stem: doc.file_stem().to_string(),
        relative_path: doc.relative_path().to_string(),
    }))
}

fn missing(doc: &ConfigDocument, field: &str, reason: &str) -> CfgdepsError {
    CfgdepsError::MissingIdentifier {
        path: PathBuf::from(doc.relative_path()),
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
