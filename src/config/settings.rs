//! Engine settings loaded from `cfgdeps.toml`.
//!
//! Every key is optional; a missing file means built-in defaults. Keys use
//! kebab-case:
//!
//! ```toml
//! reference-fields = ["mzId", "managementZoneId", "applicationIdentifier"]
//! identifier-field = "id"
//! application-identifier-field = "identifier"
//! application-marker = "application"
//! document-extension = "json"
//! manifest-extensions = ["yaml", "yml"]
//! identifier-extension = "id"
//! api-types = ["my-custom-api"]
//! non-api-types = ["dashboard"]
//! allow-stripped-identifiers = false
//! ```

use crate::core::CfgdepsError;
use crate::core::file_error::FileOps;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "CFGDEPS_CONFIG";

/// Settings file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "cfgdeps.toml";

/// Tunables of the dependency resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
    /// Top-level field names whose values reference another configuration's identifier.
    pub reference_fields: BTreeSet<String>,

    /// Identifier field of ordinary configuration documents.
    pub identifier_field: String,

    /// Identifier field of application-family documents.
    pub application_identifier_field: String,

    /// Substring of a document's relative path marking the application family.
    pub application_marker: String,

    /// Extension of configuration documents.
    pub document_extension: String,

    /// Extensions of parameter manifests.
    pub manifest_extensions: Vec<String>,

    /// Extension that replaces [`Self::document_extension`] in reference paths.
    pub identifier_extension: String,

    /// Configuration types treated as API-backed in addition to the built-in list.
    pub api_types: BTreeSet<String>,

    /// Built-in API types that should not receive manifest parameters.
    pub non_api_types: BTreeSet<String>,

    /// Accept documents whose identifier was already stripped by an earlier run.
    ///
    /// Such documents are skipped by the identity pass instead of being reported
    /// as missing their identifier.
    pub allow_stripped_identifiers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference_fields: ["mzId", "managementZoneId", "applicationIdentifier"]
                .into_iter()
                .map(String::from)
                .collect(),
            identifier_field: "id".to_string(),
            application_identifier_field: "identifier".to_string(),
            application_marker: "application".to_string(),
            document_extension: "json".to_string(),
            manifest_extensions: vec!["yaml".to_string(), "yml".to_string()],
            identifier_extension: "id".to_string(),
            api_types: BTreeSet::new(),
            non_api_types: BTreeSet::new(),
            allow_stripped_identifiers: false,
        }
    }
}

impl Settings {
    /// Load settings, falling back through the usual locations.
    ///
    /// Resolution order:
    /// 1. `explicit` (from `--config`); must exist
    /// 2. `$CFGDEPS_CONFIG`; must exist
    /// 3. `./cfgdeps.toml` if present
    /// 4. `<config dir>/cfgdeps/config.toml` if present
    /// 5. [`Settings::default`]
    pub async fn load_with_optional(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(&path).await;
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return Self::load_from(Path::new(&path)).await;
        }

        for candidate in Self::search_paths() {
            let exists = FileOps::exists_with_context(
                &candidate,
                "locating settings",
                "config::settings",
            )
            .await?;
            if exists {
                return Self::load_from(&candidate).await;
            }
        }

        debug!("No settings file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate settings from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading settings from {}", path.display());

        let content = FileOps::read_with_context(path, "loading settings", "config::settings")
            .await
            .map_err(|e| CfgdepsError::ConfigError {
                message: e.user_message(),
            })?;

        let settings: Self = toml::from_str(&content)
            .map_err(CfgdepsError::from)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Default, implicitly searched locations.
    #[must_use]
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("cfgdeps").join("config.toml"));
        }
        paths
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<(), CfgdepsError> {
        let invalid = |message: &str| {
            Err(CfgdepsError::ConfigError {
                message: message.to_string(),
            })
        };

        if self.reference_fields.iter().any(String::is_empty) {
            return invalid("reference-fields must not contain empty names");
        }
        if self.identifier_field.is_empty() || self.application_identifier_field.is_empty() {
            return invalid("identifier fields must not be empty");
        }
        if self.document_extension.is_empty() || self.identifier_extension.is_empty() {
            return invalid("document-extension and identifier-extension must not be empty");
        }
        if self.document_extension == self.identifier_extension {
            return invalid("identifier-extension must differ from document-extension");
        }
        if self.manifest_extensions.iter().any(|ext| *ext == self.document_extension) {
            return invalid("manifest-extensions must not include the document extension");
        }
        if let Some(both) = self.api_types.intersection(&self.non_api_types).next() {
            return Err(CfgdepsError::ConfigError {
                message: format!("'{both}' is listed in both api-types and non-api-types"),
            });
        }
        Ok(())
    }

    /// Whether `field` is a recognized dependency-reference field.
    #[must_use]
    pub fn is_reference_field(&self, field: &str) -> bool {
        self.reference_fields.contains(field)
    }

    /// Identifier field name for a document at `relative_path`.
    #[must_use]
    pub fn identifier_field_for(&self, relative_path: &str) -> &str {
        if relative_path.contains(&self.application_marker) {
            &self.application_identifier_field
        } else {
            &self.identifier_field
        }
    }

    /// Manifest extensions as string slices, for the directory walker.
    #[must_use]
    pub fn manifest_extension_refs(&self) -> Vec<&str> {
        self.manifest_extensions.iter().map(String::as_str).collect()
    }
}
