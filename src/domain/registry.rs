//! Document registry: display names mapped to repository-relative paths

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::domain::DomainError;

/// One registered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// Name as configured
    pub name: String,
    /// Path relative to the repository root
    pub path: PathBuf,
}

/// Lookup table keyed by normalized document name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRegistry {
    entries: BTreeMap<String, DocumentEntry>,
}

/// Normalize a document name for lookup.
///
/// Lower-cases, trims, and collapses inner whitespace runs to one space, so
/// `"  Quick   START "` and `"quick start"` are the same key.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().map(str::to_lowercase).join(" ")
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`; a later entry with the same normalized name replaces the earlier one.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        let name = name.into();
        self.entries.insert(
            normalize_name(&name),
            DocumentEntry {
                name,
                path: path.into(),
            },
        );
    }

    pub fn lookup(&self, name: &str) -> Result<&DocumentEntry, DomainError> {
        self.entries
            .get(&normalize_name(name))
            .ok_or_else(|| DomainError::UnknownDocument {
                name: name.to_string(),
                known: self.names(),
            })
    }

    /// Resolve `name` to an absolute path under `root`.
    pub fn resolve(&self, name: &str, root: &Path) -> Result<PathBuf, DomainError> {
        self.lookup(name).map(|entry| root.join(&entry.path))
    }

    /// Normalized names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, P> FromIterator<(N, P)> for DocumentRegistry
where
    N: Into<String>,
    P: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (name, path) in iter {
            registry.insert(name, path);
        }
        registry
    }
}
