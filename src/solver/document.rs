//! Configuration documents as the passes see them.

use crate::config::Settings;
use crate::core::CfgdepsError;
use crate::utils::fs::{find_files_by_extension, parent_dir_name, read_text_file, relative_slash_path, write_json_file};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::trace;

/// A parsed configuration document plus where it lives in the tree.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    relative_path: String,
    config_type: String,
    file_stem: String,
    body: Map<String, Value>,
}

impl ConfigDocument {
    /// Read and parse the document at `path`, a file below `root`.
    ///
    /// # Errors
    ///
    /// - [`CfgdepsError::Read`] if the file cannot be read
    /// - [`CfgdepsError::Parse`] if it is not a JSON object
    pub fn load(root: &Path, path: &Path) -> Result<Self, CfgdepsError> {
        let relative_path =
            relative_slash_path(root, path).unwrap_or_else(|| path.to_string_lossy().into_owned());

        let content = read_text_file(path, "loading configuration document").map_err(|e| {
            CfgdepsError::Read {
                path: PathBuf::from(&relative_path),
                reason: e.source.to_string(),
            }
        })?;

        let body = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(CfgdepsError::Parse {
                    path: PathBuf::from(&relative_path),
                    reason: format!("expected a JSON object, found {}", json_kind(&other)),
                });
            }
            Err(e) => {
                return Err(CfgdepsError::Parse {
                    path: PathBuf::from(&relative_path),
                    reason: e.to_string(),
                });
            }
        };

        let config_type = parent_dir_name(path).unwrap_or_default();
        let file_stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            relative_path,
            config_type,
            file_stem,
            body,
        })
    }

    /// Write the document back to where it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns [`CfgdepsError::Write`] if serialization or the atomic replace fails.
    pub fn save(&self) -> Result<(), CfgdepsError> {
        trace!("Writing {}", self.relative_path);
        write_json_file(&self.path, &self.body).map_err(|e| CfgdepsError::Write {
            path: PathBuf::from(&self.relative_path),
            reason: format!("{e:#}"),
        })
    }

    /// Location relative to the processed root, `/`-separated.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Name of the containing directory.
    #[must_use]
    pub fn config_type(&self) -> &str {
        &self.config_type
    }

    /// File name without extension.
    #[must_use]
    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    /// Top-level fields.
    #[must_use]
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Top-level fields, mutable.
    pub fn body_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.body
    }
}

/// Every configuration document below `root`, in walk order.
///
/// Walk failures are converted to [`CfgdepsError::Read`] and returned alongside
/// the paths that could be enumerated.
pub fn discover_documents(root: &Path, settings: &Settings) -> (Vec<PathBuf>, Vec<CfgdepsError>) {
    let mut paths = Vec::new();
    let mut errors = Vec::new();

    for entry in find_files_by_extension(root, &[settings.document_extension.as_str()]) {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => errors.push(CfgdepsError::Read {
                path: e.file_path.clone(),
                reason: e.source.to_string(),
            }),
        }
    }

    (paths, errors)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
