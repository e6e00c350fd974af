//! Parameter manifests: the YAML sidecar of each configuration type.
//!
//! A manifest maps each config's name to an ordered list of single-key
//! parameter mappings. The render step later substitutes these parameters into
//! the templated documents.
//!
//! # Format
//!
//! ```yaml
//! config:
//!   - profileA: profileA.json
//! profileA:
//!   - name: Profile A
//!   - mzId: management-zone/zoneA.id
//! ```
//!
//! Only the entry lists are touched here; any other key (like `config` above)
//! is carried through unchanged. Key order is preserved.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cfgdeps_cli::manifest::{ParameterChange, ParameterManifest};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let root = Path::new("download/prod");
//! let mut manifest = ParameterManifest::load(root, &root.join("alerting-profile/alerting-profile.yaml"))?;
//! if manifest.has_entry("profileA") {
//!     let change = manifest.add_parameter("profileA", "mzId", "management-zone/zoneA.id")?;
//!     assert_ne!(change, ParameterChange::Unchanged);
//! }
//! manifest.save()?;
//! # Ok(())
//! # }
//! ```

use crate::core::CfgdepsError;
use crate::utils::fs::{read_text_file, relative_slash_path, write_yaml_file};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

/// Outcome of adding one parameter to a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterChange {
    /// A new `{field: value}` mapping was appended
    Added,
    /// The field existed with another value, which was replaced
    Updated,
    /// The exact mapping was already present
    Unchanged,
}

/// Why a parameter could not be placed in a manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The manifest has no key for the config
    #[error("no entry named '{0}'")]
    Missing(String),
    /// The key exists but does not hold a parameter list
    #[error("entry '{0}' is not a list of parameters")]
    NotAList(String),
}

/// A loaded parameter manifest.
#[derive(Debug, Clone)]
pub struct ParameterManifest {
    path: PathBuf,
    relative_path: String,
    entries: Mapping,
    modified: bool,
}

impl ParameterManifest {
    /// Read and parse the manifest at `path`, a file below `root`.
    ///
    /// An empty file is an empty manifest.
    ///
    /// # Errors
    ///
    /// - [`CfgdepsError::Read`] if the file cannot be read
    /// - [`CfgdepsError::Parse`] if it is not YAML or its top level is not a mapping
    pub fn load(root: &Path, path: &Path) -> Result<Self, CfgdepsError> {
        let relative_path =
            relative_slash_path(root, path).unwrap_or_else(|| path.to_string_lossy().into_owned());

        let content = read_text_file(path, "loading parameter manifest").map_err(|e| {
            CfgdepsError::Read {
                path: PathBuf::from(&relative_path),
                reason: e.source.to_string(),
            }
        })?;

        let parse_error = |reason: String| CfgdepsError::Parse {
            path: PathBuf::from(&relative_path),
            reason,
        };

        let entries = match serde_yaml::from_str::<Value>(&content).map_err(|e| parse_error(e.to_string()))? {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => return Err(parse_error("top level is not a mapping".to_string())),
        };

        Ok(Self {
            path: path.to_path_buf(),
            relative_path,
            entries,
            modified: false,
        })
    }

    /// Location relative to the processed root.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Whether the manifest has an entry for `config_name`.
    #[must_use]
    pub fn has_entry(&self, config_name: &str) -> bool {
        self.entries.contains_key(config_name)
    }

    /// Parameters of `config_name` as `(field, value)` pairs.
    ///
    /// Items that are not single-key string mappings are skipped.
    #[must_use]
    pub fn parameters(&self, config_name: &str) -> Option<Vec<(String, String)>> {
        let list = self.entries.get(config_name)?.as_sequence()?;
        Some(
            list.iter()
                .filter_map(single_pair)
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Add `field: value` to the parameter list of `config_name`.
    ///
    /// The list never holds the same field twice: an existing mapping for
    /// `field` is updated in place instead of appending another one.
    ///
    /// # Errors
    ///
    /// Returns an [`EntryError`] if the entry is missing or not a list.
    pub fn add_parameter(
        &mut self,
        config_name: &str,
        field: &str,
        value: &str,
    ) -> Result<ParameterChange, EntryError> {
        // `profileA:` with no items
        if matches!(self.entries.get(config_name), Some(Value::Null)) {
            self.entries.insert(Value::from(config_name), Value::Sequence(Vec::new()));
        }

        let list = match self.entries.get_mut(config_name) {
            None => return Err(EntryError::Missing(config_name.to_string())),
            Some(Value::Sequence(list)) => list,
            Some(_) => return Err(EntryError::NotAList(config_name.to_string())),
        };

        for item in list.iter_mut() {
            let Value::Mapping(map) = item else {
                continue;
            };
            if map.len() != 1 {
                continue;
            }
            if let Some(existing) = map.get_mut(field) {
                if existing.as_str() == Some(value) {
                    return Ok(ParameterChange::Unchanged);
                }
                trace!("{}: updating {config_name}.{field}", self.relative_path);
                *existing = Value::from(value);
                self.modified = true;
                return Ok(ParameterChange::Updated);
            }
        }

        let mut parameter = Mapping::new();
        parameter.insert(Value::from(field), Value::from(value));
        list.push(Value::Mapping(parameter));
        self.modified = true;
        trace!("{}: added {config_name}.{field}", self.relative_path);
        Ok(ParameterChange::Added)
    }

    /// Whether [`Self::add_parameter`] changed anything since loading.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Write the manifest back to disk.
    ///
    /// # Errors
    ///
    /// Returns [`CfgdepsError::Write`] if serialization or the atomic replace fails.
    pub fn save(&self) -> Result<(), CfgdepsError> {
        write_yaml_file(&self.path, &self.entries).map_err(|e| CfgdepsError::Write {
            path: PathBuf::from(&self.relative_path),
            reason: format!("{e:#}"),
        })
    }
}

fn single_pair(item: &Value) -> Option<(&str, &str)> {
    let map = item.as_mapping()?;
    if map.len() != 1 {
        return None;
    }
    let (key, value) = map.iter().next()?;
    Some((key.as_str()?, value.as_str()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MANIFEST: &str = "\
config:
- profileA: profileA.json
profileA:
- name: Profile A
profileB: not-a-list
profileC:
";

    fn load(content: &str) -> (tempfile::TempDir, ParameterManifest) {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("alerting-profile");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("alerting-profile.yaml");
        std::fs::write(&path, content).unwrap();
        let manifest = ParameterManifest::load(temp.path(), &path).unwrap();
        (temp, manifest)
    }

    #[test]
    fn test_add_parameter_appends_once() {
        let (_temp, mut manifest) = load(MANIFEST);

        let first = manifest.add_parameter("profileA", "mzId", "management-zone/zoneA.id").unwrap();
        let second = manifest.add_parameter("profileA", "mzId", "management-zone/zoneA.id").unwrap();

        assert_eq!(first, ParameterChange::Added);
        assert_eq!(second, ParameterChange::Unchanged);
        assert_eq!(
            manifest.parameters("profileA").unwrap(),
            vec![
                ("name".to_string(), "Profile A".to_string()),
                ("mzId".to_string(), "management-zone/zoneA.id".to_string()),
            ]
        );
    }

    #[test]
    fn test_add_parameter_updates_changed_value() {
        let (_temp, mut manifest) = load(MANIFEST);
        manifest.add_parameter("profileA", "mzId", "management-zone/old.id").unwrap();

        let change = manifest.add_parameter("profileA", "mzId", "management-zone/new.id").unwrap();

        assert_eq!(change, ParameterChange::Updated);
        let params = manifest.parameters("profileA").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].1, "management-zone/new.id");
    }

    #[test]
    fn test_add_parameter_entry_errors() {
        let (_temp, mut manifest) = load(MANIFEST);

        assert_eq!(
            manifest.add_parameter("missing", "mzId", "x.id"),
            Err(EntryError::Missing("missing".to_string()))
        );
        assert_eq!(
            manifest.add_parameter("profileB", "mzId", "x.id"),
            Err(EntryError::NotAList("profileB".to_string()))
        );
        assert!(!manifest.is_modified());
    }

    #[test]
    fn test_empty_entry_becomes_list() {
        let (_temp, mut manifest) = load(MANIFEST);

        assert_eq!(manifest.add_parameter("profileC", "mzId", "z.id"), Ok(ParameterChange::Added));
        assert_eq!(manifest.parameters("profileC").unwrap(), vec![("mzId".to_string(), "z.id".to_string())]);
    }

    #[test]
    fn test_save_preserves_other_keys() {
        let (temp, mut manifest) = load(MANIFEST);
        manifest.add_parameter("profileA", "mzId", "management-zone/zoneA.id").unwrap();
        manifest.save().unwrap();

        let path = temp.path().join("alerting-profile/alerting-profile.yaml");
        let reloaded = ParameterManifest::load(temp.path(), &path).unwrap();
        assert!(reloaded.has_entry("config"));
        assert_eq!(reloaded.parameters("profileA").unwrap().len(), 2);
        assert_eq!(reloaded.relative_path(), "alerting-profile/alerting-profile.yaml");
    }

    #[test]
    fn test_load_rejects_non_mapping() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("list.yaml");
        std::fs::write(&path, "- a\n- b\n").unwrap();

        let err = ParameterManifest::load(temp.path(), &path).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_load_empty_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.yaml");
        std::fs::write(&path, "").unwrap();

        let manifest = ParameterManifest::load(temp.path(), &path).unwrap();
        assert!(!manifest.has_entry("anything"));
    }

    #[test]
    fn test_save_after_directory_removed_is_write_error() {
        let (temp, mut manifest) = load(MANIFEST);
        manifest.add_parameter("profileA", "mzId", "management-zone/zoneA.id").unwrap();
        std::fs::remove_dir_all(temp.path().join("alerting-profile")).unwrap();

        let err = manifest.save().unwrap_err();
        assert_eq!(err.kind(), "write");
        assert!(err.to_string().contains("alerting-profile/alerting-profile.yaml"));
    }
}
