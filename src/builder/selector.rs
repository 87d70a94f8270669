//! Ordered (path, label) lists backing the display and filter selectors.

use serde::Serialize;

use crate::path::ColumnPath;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorEntry {
    pub path: ColumnPath,
    pub label: String,
}

/// Selector list state. Entries are unique by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectorList {
    entries: Vec<SelectorEntry>,
}

impl SelectorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &ColumnPath) -> bool {
        self.entries.iter().any(|entry| &entry.path == path)
    }

    /// Append an entry. Returns false if the path is already listed.
    pub fn add(&mut self, path: ColumnPath, label: impl Into<String>) -> bool {
        if self.contains(&path) {
            return false;
        }
        self.entries.push(SelectorEntry {
            path,
            label: label.into(),
        });
        true
    }

    /// Remove the entry for `path`. Returns whether it was listed.
    pub fn remove(&mut self, path: &ColumnPath) -> bool {
        match self.entries.iter().position(|entry| &entry.path == path) {
            Some(position) => {
                self.entries.remove(position);
                true
            }
            None => false,
        }
    }

    /// Remove every listed path in `paths`, returning the ones removed.
    pub fn remove_all(&mut self, paths: &[ColumnPath]) -> Vec<ColumnPath> {
        paths
            .iter()
            .filter(|path| self.remove(path))
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectorEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[SelectorEntry] {
        &self.entries
    }
}
