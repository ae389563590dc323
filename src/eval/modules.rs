//! Module table and sources
//!
//! Module evaluation is memoized per [`ModulePath`]: the first `require`
//! triggers evaluation, every later one observes the same record. Parsed
//! trees come from an injected [`ModuleSource`]; the concrete parser for
//! any source language lives outside this crate.

use crate::resolve::path::ModulePath;
use crate::scope::env::Frame;
use crate::scope::exports::ExportTable;
use crate::syntax::Node;
use std::collections::HashMap;

/// Supplies the parsed tree for a resolved module.
pub trait ModuleSource {
    /// The tree for `path`, or `None` when the module has no source (e.g.
    /// a synthetic unknown-module stand-in)
    fn load(&self, path: &ModulePath) -> Option<Node>;
}

/// In-memory module sources, for tests and hosts that parse elsewhere.
#[derive(Debug, Default)]
pub struct MemorySources {
    modules: HashMap<ModulePath, Node>,
}

impl MemorySources {
    /// Create an empty source set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module tree
    pub fn with(mut self, path: impl Into<ModulePath>, tree: Node) -> Self {
        self.modules.insert(path.into(), tree);
        self
    }

    /// Insert a module tree
    pub fn insert(&mut self, path: ModulePath, tree: Node) {
        self.modules.insert(path, tree);
    }
}

impl ModuleSource for MemorySources {
    fn load(&self, path: &ModulePath) -> Option<Node> {
        self.modules.get(path).cloned()
    }
}

/// The result of evaluating one module: its module-level bindings and its
/// export table. Values live in the evaluator's shared store.
#[derive(Debug, Clone, Default)]
pub struct ModuleRecord {
    pub bindings: Frame,
    pub exports: ExportTable,
}

/// Completed modules, keyed by resolved path.
#[derive(Debug, Default)]
pub struct ModuleTable {
    modules: HashMap<ModulePath, ModuleRecord>,
}

impl ModuleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for a completed module
    pub fn get(&self, path: &ModulePath) -> Option<&ModuleRecord> {
        self.modules.get(path)
    }

    /// Record a completed module
    pub fn insert(&mut self, path: ModulePath, record: ModuleRecord) {
        self.modules.insert(path, record);
    }

    /// Whether a module has completed evaluation
    pub fn contains(&self, path: &ModulePath) -> bool {
        self.modules.contains_key(path)
    }

    /// Iterate completed modules
    pub fn iter(&self) -> impl Iterator<Item = (&ModulePath, &ModuleRecord)> {
        self.modules.iter()
    }

    /// Number of completed modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module has completed
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Node;

    #[test]
    fn test_memory_sources_load() {
        let sources = MemorySources::new().with("/m/a.ts", Node::statements(vec![]));
        assert!(sources.load(&ModulePath::new("/m/a.ts")).is_some());
        assert!(sources.load(&ModulePath::new("/m/b.ts")).is_none());
    }

    #[test]
    fn test_table_round_trip() {
        let mut table = ModuleTable::new();
        let path = ModulePath::new("/m/a.ts");
        assert!(!table.contains(&path));

        table.insert(path.clone(), ModuleRecord::default());
        assert!(table.contains(&path));
        assert_eq!(table.len(), 1);
        assert!(table.get(&path).unwrap().exports.is_empty());
    }
}
