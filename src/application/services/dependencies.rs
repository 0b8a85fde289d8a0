//! Dependency reports: read-only walks over include nodes.

use std::collections::HashSet;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{DomainError, DomainResult, FileId, FileRegistry, NodeArena, NodeKind};

pub struct DependencyWalker<'a> {
    arena: &'a NodeArena,
    files: &'a FileRegistry,
}

impl<'a> DependencyWalker<'a> {
    pub fn new(arena: &'a NodeArena, files: &'a FileRegistry) -> Self {
        Self { arena, files }
    }

    /// Distinct files included directly by `file`, in document order.
    pub fn immediate(&self, file: FileId) -> DomainResult<Vec<FileId>> {
        let root = self
            .files
            .get(file)
            .and_then(|entry| entry.root)
            .ok_or_else(|| DomainError::Internal(format!("file #{} has no root node", file)))?;

        let mut seen = HashSet::new();
        Ok(self
            .arena
            .iter_from(root)
            .filter_map(|(_, node)| match &node.kind {
                NodeKind::Include(include) => include.file,
                _ => None,
            })
            .filter(|id| seen.insert(*id))
            .collect())
    }

    /// Every distinct file reachable from `root`, depth-first in document
    /// order, `root` itself excluded.
    #[instrument(level = "debug", skip(self))]
    pub fn transitive(&self, root: FileId) -> DomainResult<Vec<FileId>> {
        let mut visited = HashSet::from([root]);
        let mut order = Vec::new();
        self.visit(root, &mut visited, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        file: FileId,
        visited: &mut HashSet<FileId>,
        order: &mut Vec<FileId>,
    ) -> DomainResult<()> {
        for dep in self.immediate(file)? {
            if visited.insert(dep) {
                order.push(dep);
                self.visit(dep, visited, order)?;
            }
        }
        Ok(())
    }

    /// Include hierarchy of `root`; a file already on the current branch is
    /// shown once more with a `(recursive)` marker and not expanded.
    pub fn tree(&self, root: FileId, label: &dyn Fn(FileId) -> String) -> DomainResult<Tree<String>> {
        let mut branch = vec![root];
        self.subtree(root, label, &mut branch)
    }

    fn subtree(
        &self,
        file: FileId,
        label: &dyn Fn(FileId) -> String,
        branch: &mut Vec<FileId>,
    ) -> DomainResult<Tree<String>> {
        let mut tree = Tree::new(label(file));
        for dep in self.immediate(file)? {
            if branch.contains(&dep) {
                tree.push(Tree::new(format!("{} (recursive)", label(dep))));
                continue;
            }
            branch.push(dep);
            tree.push(self.subtree(dep, label, branch)?);
            branch.pop();
        }
        Ok(tree)
    }
}
