//! Version catalog.
//!
//! Maps release labels to version identifiers. Two labels are special:
//! - `current`: the default release, published without a version segment
//! - `next`: the in-progress release, hidden outside development builds
//!
//! The catalog is loaded once from a JSON object and never mutated. Entry
//! order follows declaration order in the source file.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

/// Label of the default (unversioned) release.
pub const CURRENT_KEY: &str = "current";

/// Label of the pre-release version.
pub const NEXT_KEY: &str = "next";

/// Error loading a version catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read version catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Catalog is not a JSON object of strings, or repeats a key.
    #[error("Invalid version catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// Catalog has no `current` entry.
    #[error("Version catalog has no \"current\" entry")]
    MissingCurrent,
    /// Same label declared twice.
    #[error("Version catalog declares {0:?} more than once")]
    DuplicateKey(String),
}

/// Ordered, read-only mapping from version labels to identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCatalog {
    entries: Vec<(String, String)>,
    current: usize,
}

impl VersionCatalog {
    /// Build a catalog from `(label, version id)` pairs in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateKey`] if a label repeats and
    /// [`CatalogError::MissingCurrent`] if there is no `current` label.
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self, CatalogError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            if !seen.insert(key.clone()) {
                return Err(CatalogError::DuplicateKey(key));
            }
            collected.push((key, value.into()));
        }

        let current = collected
            .iter()
            .position(|(key, _)| key == CURRENT_KEY)
            .ok_or(CatalogError::MissingCurrent)?;

        Ok(Self {
            entries: collected,
            current,
        })
    }

    /// Parse a catalog from a JSON object such as
    /// `{"current": "v3", "next": "v4", "v2": "v2"}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, has non-string values,
    /// repeats a key, or has no `current` entry.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let RawCatalog(entries) = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file can't be read, otherwise
    /// the errors of [`VersionCatalog::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            versions = catalog.entries.len(),
            current = %catalog.current(),
            "Loaded version catalog"
        );
        Ok(catalog)
    }

    /// Resolve a label to its version identifier.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(label, version id)` pairs in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Identifier of the default release.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.entries[self.current].1
    }

    /// Identifier of the pre-release, if declared.
    #[must_use]
    pub fn next(&self) -> Option<&str> {
        self.resolve(NEXT_KEY)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A valid catalog always holds `current`, so this is never true.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// JSON object read entry by entry so declaration order survives.
struct RawCatalog(Vec<(String, String)>);

impl<'de> Deserialize<'de> for RawCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawCatalogVisitor;

        impl<'de> Visitor<'de> for RawCatalogVisitor {
            type Value = RawCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping version labels to version identifiers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, String)> = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(de::Error::custom(format!(
                            "duplicate version label {key:?}"
                        )));
                    }
                    entries.push((key, value));
                }
                Ok(RawCatalog(entries))
            }
        }

        deserializer.deserialize_map(RawCatalogVisitor)
    }
}
