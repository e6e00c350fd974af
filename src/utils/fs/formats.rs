//! Reading and writing the file formats found in a downloaded tree.
//!
//! - Plain text (every read goes through [`read_text_file`])
//! - JSON configuration documents
//! - YAML parameter manifests
//!
//! All write operations go through [`super::atomic::safe_write`].

use crate::core::file_error::{FileOperation, FileOperationError, FileResultExt};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Reads a text file, remembering which file failed and why it was read.
///
/// # Errors
/// Returns a [`FileOperationError`] if the file cannot be read or is not UTF-8.
pub fn read_text_file(path: &Path, purpose: &str) -> Result<String, FileOperationError> {
    fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        purpose,
        "utils::fs::formats::read_text_file",
    )
}

/// Writes a text file atomically.
///
/// # Errors
/// Returns an error with context if the file cannot be written
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    super::atomic::safe_write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Serializes data as pretty JSON (two-space indent, trailing newline) and
/// writes it atomically.
///
/// # Errors
/// Returns an error if serialization fails or the file cannot be written
pub fn write_json_file<T>(path: &Path, data: &T) -> Result<()>
where
    T: serde::Serialize,
{
    let mut json = serde_json::to_string_pretty(data)
        .with_context(|| format!("Failed to serialize JSON for: {}", path.display()))?;
    json.push('\n');

    write_text_file(path, &json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))
}

/// Serializes data as YAML and writes it atomically.
///
/// # Errors
/// Returns an error if serialization fails or the file cannot be written
pub fn write_yaml_file<T>(path: &Path, data: &T) -> Result<()>
where
    T: serde::Serialize,
{
    let yaml = serde_yaml::to_string(data)
        .with_context(|| format!("Failed to serialize data to YAML for: {}", path.display()))?;

    write_text_file(path, &yaml)
        .with_context(|| format!("Failed to write YAML file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_write_json_file_keeps_field_order() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("profile.json");
        let doc: serde_json::Value =
            serde_json::from_str(r#"{"name":"p","mzId":"{{.mzId}}","rules":[]}"#).unwrap();

        write_json_file(&path, &doc).unwrap();

        let content = read_text_file(&path, "test").unwrap();
        let name_at = content.find("\"name\"").unwrap();
        let mz_at = content.find("\"mzId\"").unwrap();
        let rules_at = content.find("\"rules\"").unwrap();
        assert!(name_at < mz_at && mz_at < rules_at);
        assert!(content.ends_with("}\n"));
    }

    #[test]
    fn test_write_yaml_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("manifest.yaml");

        write_yaml_file(&path, &json!({"profileA": [{"name": "Profile A"}]})).unwrap();

        let content = read_text_file(&path, "test").unwrap();
        assert!(content.contains("profileA:"));
        assert!(content.contains("- name: Profile A"));
    }

    #[test]
    fn test_read_text_file_missing() {
        let temp = tempdir().unwrap();
        let err = read_text_file(&temp.path().join("gone.json"), "indexing identifiers").unwrap_err();
        assert_eq!(err.operation, FileOperation::Read);
        assert_eq!(err.purpose, "indexing identifiers");
    }
}
