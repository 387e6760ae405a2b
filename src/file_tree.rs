// Global runtime file tree: the union of every plugin's runtime files
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::error::{FileTreeError, Result};
use crate::plugin::{Artifact, FileSource, NormalizedPlugin};

/// Who declared a path in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum Owner {
    Plugin(Artifact),
    Generated,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Plugin(artifact) => write!(f, "plugin '{artifact}'"),
            Owner::Generated => f.write_str("the generated config"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub source: FileSource,
    pub owner: Owner,
}

/// Path -> content mapping, relative to the nvim config directory.
///
/// Merge policy: a path may be declared more than once only if every
/// declaration carries an equal content source (idempotent union). The first
/// owner is kept. Differing sources are a collision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GlobalFileTree {
    entries: BTreeMap<String, FileEntry>,
}

impl GlobalFileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union the runtime files of every plugin, in plugin order
    pub fn merge_plugins(plugins: &[NormalizedPlugin]) -> Result<Self> {
        let mut tree = Self::new();
        for plugin in plugins {
            for (path, source) in &plugin.runtime {
                tree.insert(path, source.clone(), Owner::Plugin(plugin.artifact.clone()))?;
            }
        }
        tracing::debug!(files = tree.len(), "Merged plugin runtime files");
        Ok(tree)
    }

    /// Add one entry under the merge policy
    pub fn insert(&mut self, path: &str, source: FileSource, owner: Owner) -> Result<()> {
        let key = normalize_runtime_path(path).map_err(|reason| FileTreeError::InvalidPath {
            path: path.to_string(),
            owner: owner.to_string(),
            reason: reason.to_string(),
        })?;
        match self.entries.entry(key) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(FileEntry { source, owner });
                Ok(())
            }
            btree_map::Entry::Occupied(existing) => {
                if existing.get().source == source {
                    tracing::debug!(
                        path = %existing.key(),
                        first = %existing.get().owner,
                        second = %owner,
                        "Identical runtime file declared twice"
                    );
                    return Ok(());
                }
                Err(FileTreeError::PathCollision {
                    path: existing.key().clone(),
                    first: existing.get().owner.to_string(),
                    second: owner.to_string(),
                }
                .into())
            }
        }
    }

    /// Layer a generated file on top of the plugin files
    pub fn layer_generated(&mut self, path: &str, source: FileSource) -> Result<()> {
        self.insert(path, source, Owner::Generated)
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(&normalize_path(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileEntry)> {
        self.entries.iter().map(|(path, entry)| (path.as_str(), entry))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical key for a path that must stay inside the config directory.
///
/// Both `/` and `\` separate segments. A path that could leave the directory
/// or that names no file is rejected with a reason.
pub fn normalize_runtime_path(path: &str) -> std::result::Result<String, &'static str> {
    let bytes = path.as_bytes();
    if path.starts_with(['/', '\\']) {
        return Err("absolute paths are not allowed");
    }
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return Err("drive prefixes are not allowed");
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err("'..' segments are not allowed");
    }
    let key = normalize_path(path);
    if key.is_empty() {
        return Err("path names no file");
    }
    Ok(key)
}

/// Canonical key: no `.` segments, no empty segments, `/` separated
fn normalize_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
