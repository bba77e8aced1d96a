//! The resolved symbol table for one document

use indexmap::IndexMap;
use serde::Serialize;
use wr_parser::ImportBinding;

/// Ordered mapping from local symbol name to its final resolved string.
///
/// Binding an already-present name replaces its value (shadowing, last
/// write wins) while keeping its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedScope {
    entries: IndexMap<String, String>,
}

impl ResolvedScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// The names an importer asked for: remote name → local alias.
///
/// A pruning signal, not a hard filter: the imported file still computes
/// its full scope (transitive references may need any of it); this only
/// shapes the view handed back to the importer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredSet {
    entries: IndexMap<String, String>,
}

impl RequiredSet {
    pub fn from_bindings(bindings: &[ImportBinding]) -> Self {
        let mut entries = IndexMap::new();
        for binding in bindings {
            entries.insert(binding.remote_name.clone(), binding.local_name.clone());
        }
        Self { entries }
    }

    /// Projects a file's full scope down to the required names, re-keyed to
    /// the importer's local aliases. Required names the scope lacks are
    /// silently absent.
    pub fn filter(&self, scope: &ResolvedScope) -> ResolvedScope {
        let mut view = ResolvedScope::new();
        for (remote, local) in &self.entries {
            if let Some(value) = scope.get(remote) {
                view.bind(local.clone(), value);
            }
        }
        view
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
