//! Data passed between the engine passes.

use serde::Serialize;
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Where one identifier lives in the downloaded tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    /// Identifier assigned by the source system
    pub id: String,
    /// Document file name without extension (the config's name in its manifest)
    pub file_stem: String,
    /// Document path relative to the processed root, `/`-separated
    pub relative_path: String,
}

impl IdentityRecord {
    /// Reference path handed to the render step: the relative path with the
    /// document extension swapped for the identifier extension.
    ///
    /// ```rust
    /// use cfgdeps_cli::solver::IdentityRecord;
    ///
    /// let record = IdentityRecord {
    ///     id: "Z1".to_string(),
    ///     file_stem: "zoneA".to_string(),
    ///     relative_path: "management-zone/zoneA.json".to_string(),
    /// };
    /// assert_eq!(record.reference_path("json", "id"), "management-zone/zoneA.id");
    /// ```
    #[must_use]
    pub fn reference_path(&self, document_extension: &str, identifier_extension: &str) -> String {
        let suffix = format!(".{document_extension}");
        let base = self.relative_path.strip_suffix(&suffix).unwrap_or(&self.relative_path);
        format!("{base}.{identifier_extension}")
    }
}

/// Two documents claimed the same identifier.
///
/// The index is keyed by bare identifier, so the later document (in traversal
/// order) replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierCollision {
    /// The shared identifier
    pub id: String,
    /// Relative path of the record that now owns the identifier
    pub kept: String,
    /// Relative path of the record that was overwritten
    pub replaced: String,
}

/// Identifier → location mapping built by the identity pass.
///
/// Immutable once the reference pass starts: later passes only receive `&IdentityIndex`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityIndex {
    records: BTreeMap<String, IdentityRecord>,
    collisions: Vec<IdentifierCollision>,
}

impl IdentityIndex {
    /// Empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document; returns the record it replaced, if any.
    ///
    /// Replacing a record of a different document is remembered as an
    /// [`IdentifierCollision`].
    pub fn insert(&mut self, record: IdentityRecord) -> Option<IdentityRecord> {
        let kept = record.relative_path.clone();
        let replaced = self.records.insert(record.id.clone(), record)?;
        if replaced.relative_path != kept {
            self.collisions.push(IdentifierCollision {
                id: replaced.id.clone(),
                kept,
                replaced: replaced.relative_path.clone(),
            });
        }
        Some(replaced)
    }

    /// Identifiers that were claimed more than once, in discovery order.
    #[must_use]
    pub fn collisions(&self) -> &[IdentifierCollision] {
        &self.collisions
    }

    /// Look up the document holding `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IdentityRecord> {
        self.records.get(id)
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when no identifier was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &IdentityRecord> {
        self.records.values()
    }
}

impl FromIterator<IdentityRecord> for IdentityIndex {
    fn from_iter<T: IntoIterator<Item = IdentityRecord>>(iter: T) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

/// One resolved reference that must become a manifest parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDescriptor {
    /// Reference field name, also the parameter name
    pub field_name: String,
    /// Path of the referenced document with the identifier extension
    pub reference_path: String,
    /// Type (directory) of the referencing document
    pub owner_config_type: String,
    /// Name of the referencing document (its file stem)
    pub owner_config_name: String,
}

/// Descriptors grouped by owning configuration type.
///
/// Types iterate in name order; descriptors of one type keep traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSet {
    by_type: BTreeMap<String, Vec<DependencyDescriptor>>,
}

impl DescriptorSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor under its owner type.
    pub fn push(&mut self, descriptor: DependencyDescriptor) {
        self.by_type.entry(descriptor.owner_config_type.clone()).or_default().push(descriptor);
    }

    /// Descriptors owned by `config_type`.
    #[must_use]
    pub fn for_type(&self, config_type: &str) -> &[DependencyDescriptor] {
        self.by_type.get(config_type).map_or(&[], Vec::as_slice)
    }

    /// Configuration types with at least one descriptor.
    pub fn config_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    /// Total number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    /// `true` when nothing has to be injected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// `(type, descriptors)` pairs in type order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<DependencyDescriptor>> {
        self.by_type.iter()
    }
}

impl Extend<DependencyDescriptor> for DescriptorSet {
    fn extend<T: IntoIterator<Item = DependencyDescriptor>>(&mut self, iter: T) {
        for descriptor in iter {
            self.push(descriptor);
        }
    }
}

impl FromIterator<DependencyDescriptor> for DescriptorSet {
    fn from_iter<T: IntoIterator<Item = DependencyDescriptor>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Shape of a top-level JSON value, as far as reference scanning cares.
///
/// Only [`FieldValue::String`] and [`FieldValue::Number`] can hold an
/// identifier. Objects and arrays are [`FieldValue::Nested`] and are never
/// descended into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// JSON string
    String(&'a str),
    /// JSON number
    Number(&'a Number),
    /// JSON object or array
    Nested,
    /// `true`, `false` or `null`
    Other,
}

impl<'a> FieldValue<'a> {
    /// Classify a JSON value.
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Self::String(s),
            Value::Number(n) => Self::Number(n),
            Value::Object(_) | Value::Array(_) => Self::Nested,
            Value::Bool(_) | Value::Null => Self::Other,
        }
    }

    /// Text form of a scalar, used as the identifier lookup key.
    #[must_use]
    pub fn scalar_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Self::String(s) => Some(Cow::Borrowed(*s)),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Nested | Self::Other => None,
        }
    }
}

/// Placeholder written in place of a resolved reference: `{{.<field>}}`.
///
/// ```rust
/// assert_eq!(cfgdeps_cli::solver::placeholder("mzId"), "{{.mzId}}");
/// ```
#[must_use]
pub fn placeholder(field_name: &str) -> String {
    format!("{{{{.{field_name}}}}}")
}
