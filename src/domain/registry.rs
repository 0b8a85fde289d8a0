//! Session-scoped file and name registries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::arena::{FileId, NodeId};

/// Canonical path standing for standard input.
pub const STDIN_PATH: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: FileId,
    pub path: PathBuf,
    /// Root File node, set once the file has been read
    pub root: Option<NodeId>,
}

/// Canonical path <-> file id <-> root node.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
    by_path: HashMap<PathBuf, FileId>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canonical path; an already known path keeps its first id.
    ///
    /// Returns the id and whether the entry is new.
    pub fn register(&mut self, path: &Path) -> (FileId, bool) {
        if let Some(&id) = self.by_path.get(path) {
            debug!("File {} already registered as #{}", path.display(), id);
            return (id, false);
        }
        let id = self.entries.len();
        self.entries.push(FileEntry {
            id,
            path: path.to_path_buf(),
            root: None,
        });
        self.by_path.insert(path.to_path_buf(), id);
        debug!("File {} registered as #{}", path.display(), id);
        (id, true)
    }

    pub fn set_root(&mut self, id: FileId, root: NodeId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.root = Some(root);
        }
    }

    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    pub fn get(&self, id: FileId) -> Option<&FileEntry> {
        self.entries.get(id)
    }

    /// Path of a registered file, `?` for an unknown id.
    pub fn display_path(&self, id: FileId) -> String {
        self.get(id)
            .map(|e| e.path.display().to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_path.clear();
    }
}

/// Where a name was first defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameEntry {
    /// The Define node whose children form the body
    pub node: NodeId,
    pub file: FileId,
    pub line: usize,
}

/// Qualified name -> defining node.
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: HashMap<String, NameEntry>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`.
    ///
    /// Re-registration from the same file and line is a no-op and returns
    /// `Ok(false)`. A different location returns the first entry as error.
    pub fn register(&mut self, name: &str, entry: NameEntry) -> Result<bool, NameEntry> {
        match self.names.get(name) {
            Some(first) if first.file == entry.file && first.line == entry.line => Ok(false),
            Some(first) => Err(*first),
            None => {
                self.names.insert(name.to_string(), entry);
                Ok(true)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&NameEntry> {
        self.names.get(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use generational_arena::Arena;

    #[test]
    fn test_file_registry_dedups_by_canonical_path() {
        let mut files = FileRegistry::new();
        assert_eq!(files.register(Path::new("/a/b.dorothy")), (0, true));
        assert_eq!(files.register(Path::new("/a/c.dorothy")), (1, true));
        assert_eq!(files.register(Path::new("/a/b.dorothy")), (0, false));
        assert_eq!(files.len(), 2);
        assert_eq!(files.lookup(Path::new("/a/c.dorothy")), Some(1));
        assert_eq!(files.display_path(7), "?");

        files.clear();
        assert!(files.is_empty());
        assert_eq!(files.lookup(Path::new("/a/b.dorothy")), None);
    }

    #[test]
    fn test_name_registry_same_location_is_noop() {
        let mut arena = Arena::new();
        let a = arena.insert(());
        let b = arena.insert(());
        let mut names = NameRegistry::new();
        let first = NameEntry {
            node: a,
            file: 0,
            line: 3,
        };

        assert_eq!(names.register("foo-card", first), Ok(true));
        assert_eq!(names.register("foo-card", first), Ok(false));
        let other = NameEntry {
            node: b,
            file: 0,
            line: 9,
        };
        assert_eq!(names.register("foo-card", other), Err(first));
        assert_eq!(names.get("foo-card"), Some(&first));
    }
}
