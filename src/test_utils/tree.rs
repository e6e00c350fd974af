//! Temporary downloaded-configuration trees.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walkdir::WalkDir;

/// A downloaded environment laid out in a temporary directory.
///
/// Builder methods panic on IO failure; this type only exists for tests.
/// Clones and [`ConfigTree::environment`] views share the same directory, which
/// is removed when the last of them is dropped.
#[derive(Debug, Clone)]
pub struct ConfigTree {
    temp: Arc<TempDir>,
    root: PathBuf,
}

impl ConfigTree {
    /// Empty tree rooted at a fresh temporary directory.
    #[must_use]
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path().to_path_buf();
        Self {
            temp: Arc::new(temp),
            root,
        }
    }

    /// View of `<base>/<name>`, the layout one download per environment produces.
    #[must_use]
    pub fn environment(&self, name: &str) -> Self {
        let root = self.base().join(name);
        fs::create_dir_all(&root).expect("create environment dir");
        Self {
            temp: Arc::clone(&self.temp),
            root,
        }
    }

    /// The temporary directory itself.
    #[must_use]
    pub fn base(&self) -> &Path {
        self.temp.path()
    }

    /// Directory the engine should process.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add `<config_type>/<name>.json` holding `body`, pretty-printed.
    #[must_use]
    pub fn document(self, config_type: &str, name: &str, body: serde_json::Value) -> Self {
        let content = serde_json::to_string_pretty(&body).expect("serialize document");
        self.raw(config_type, &format!("{name}.json"), &content)
    }

    /// Add a parameter manifest `<config_type>/<file>`.
    #[must_use]
    pub fn manifest(self, config_type: &str, file: &str, yaml: &str) -> Self {
        self.raw(config_type, file, yaml)
    }

    /// Add an arbitrary file `<config_type>/<file>`.
    #[must_use]
    pub fn raw(self, config_type: &str, file: &str, content: &str) -> Self {
        let dir = self.root.join(config_type);
        fs::create_dir_all(&dir).expect("create config type dir");
        fs::write(dir.join(file), content).expect("write fixture file");
        self
    }

    /// Parsed content of `<config_type>/<name>.json`.
    #[must_use]
    pub fn read_json(&self, config_type: &str, name: &str) -> serde_json::Value {
        let content = self.read_raw(config_type, &format!("{name}.json"));
        serde_json::from_str(&content).expect("parse document")
    }

    /// Parsed content of a manifest.
    #[must_use]
    pub fn read_manifest(&self, config_type: &str, file: &str) -> serde_yaml::Value {
        serde_yaml::from_str(&self.read_raw(config_type, file)).expect("parse manifest")
    }

    /// Raw content of `<config_type>/<file>`.
    #[must_use]
    pub fn read_raw(&self, config_type: &str, file: &str) -> String {
        fs::read_to_string(self.root.join(config_type).join(file)).expect("read fixture file")
    }

    /// Every file below the root, keyed by `/`-separated relative path.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let relative = entry
                    .path()
                    .strip_prefix(&self.root)
                    .expect("entry below root")
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                let content = fs::read_to_string(entry.path()).expect("read snapshot file");
                (relative, content)
            })
            .collect()
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}
