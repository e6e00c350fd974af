//! Per-pass outcomes and the aggregate result of one engine invocation.

use super::types::IdentifierCollision;
use crate::core::CfgdepsError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The three engine passes, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    /// Identifier extraction and stripping
    Identity,
    /// Reference rewriting
    References,
    /// Manifest parameter injection
    Parameters,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::References => write!(f, "references"),
            Self::Parameters => write!(f, "parameters"),
        }
    }
}

/// What a pass produced plus every per-file error it recorded along the way.
///
/// A pass never stops at the first bad file: `value` reflects everything that
/// succeeded and `errors` lists the rest.
#[derive(Debug, Clone)]
pub struct PassOutcome<T> {
    /// The pass result built from the files that succeeded
    pub value: T,
    /// Per-file failures, in traversal order
    pub errors: Vec<CfgdepsError>,
}

impl<T> PassOutcome<T> {
    /// Outcome with no errors.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    /// `true` when the pass recorded no error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Counters describing one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    /// Documents whose identifier was recorded
    pub files_indexed: usize,
    /// Documents whose reference fields were rewritten
    pub files_rewritten: usize,
    /// Reference values replaced by a placeholder
    pub references_resolved: usize,
    /// Manifest files written
    pub manifests_updated: usize,
    /// Parameter entries added or updated
    pub parameters_injected: usize,
    /// Identifiers claimed by more than one document
    pub collisions: Vec<IdentifierCollision>,
}

impl fmt::Display for ProcessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} indexed, {} rewritten ({} references), {} manifests updated ({} parameters)",
            self.files_indexed,
            self.files_rewritten,
            self.references_resolved,
            self.manifests_updated,
            self.parameters_injected
        )?;
        if !self.collisions.is_empty() {
            write!(f, ", {} identifier collisions", self.collisions.len())?;
        }
        Ok(())
    }
}

/// An invocation that recorded at least one error.
///
/// Holds every error from every pass; nothing is dropped. The report shows what
/// was still done for the files that succeeded.
#[derive(Debug, Clone, Error)]
#[error("{} error(s) while processing {}", .errors.len(), .root)]
pub struct ProcessError {
    /// Root that was processed, as given by the caller
    pub root: String,
    /// Errors grouped by the pass that recorded them, in pass order
    pub errors: Vec<(Pass, CfgdepsError)>,
    /// Work completed despite the errors
    pub report: ProcessReport,
}

impl ProcessError {
    /// Errors recorded by one pass.
    pub fn errors_in(&self, pass: Pass) -> impl Iterator<Item = &CfgdepsError> {
        self.errors.iter().filter(move |(p, _)| *p == pass).map(|(_, e)| e)
    }

    /// Number of errors of the given [`CfgdepsError::kind`].
    #[must_use]
    pub fn count_kind(&self, kind: &str) -> usize {
        self.errors.iter().filter(|(_, e)| e.kind() == kind).count()
    }
}
