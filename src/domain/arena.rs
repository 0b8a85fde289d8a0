use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::NodeKind;

/// Stable handle of a node in the arena.
pub type NodeId = Index;

/// Stable id of a registered source file.
pub type FileId = usize;

/// Where a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    pub file: FileId,
    /// 1-based number of the first physical line, 0 for a file root
    pub line: usize,
    /// Leading whitespace count plus one, 0 for a file root
    pub depth: usize,
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}:{}", self.file, self.line, self.depth)
    }
}

/// Tree node in the arena-based template forest.
#[derive(Debug)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub pos: SourcePos,
    /// Index of parent node in the arena, None for file roots
    pub parent: Option<NodeId>,
    /// Indices of child nodes in source order
    pub children: Vec<NodeId>,
}

/// Arena holding every node of a session.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Each file root starts its own tree; includes refer to other trees by file id.
#[derive(Debug)]
pub struct NodeArena {
    arena: Arena<TreeNode>,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    #[instrument(level = "trace", skip(self, kind))]
    pub fn insert_root(&mut self, kind: NodeKind, pos: SourcePos) -> NodeId {
        self.arena.insert(TreeNode {
            kind,
            pos,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Insert a node below the nearest node, starting at `last` and walking
    /// up the parent chain, whose depth is strictly smaller than `pos.depth`.
    #[instrument(level = "trace", skip(self, kind))]
    pub fn attach(&mut self, last: NodeId, kind: NodeKind, pos: SourcePos) -> DomainResult<NodeId> {
        let mut candidate = Some(last);
        while let Some(idx) = candidate {
            let node = self.node(idx)?;
            if node.pos.depth < pos.depth {
                break;
            }
            candidate = node.parent;
        }
        let parent_idx = candidate.ok_or(DomainError::OrphanNode(pos.depth))?;

        let node_idx = self.arena.insert(TreeNode {
            kind,
            pos,
            parent: Some(parent_idx),
            children: Vec::new(),
        });
        match self.arena.get_mut(parent_idx) {
            Some(parent) => parent.children.push(node_idx),
            None => return Err(DomainError::Internal("parent vanished from arena".into())),
        }
        Ok(node_idx)
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Like `get_node`, but a dangling index is an internal error.
    pub fn node(&self, idx: NodeId) -> DomainResult<&TreeNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::Internal(format!("dangling node index {:?}", idx)))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order walk of the tree below `root` (root included).
    pub fn iter_from(&self, root: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, root)
    }

}

pub struct TreeIterator<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a NodeArena, root: NodeId) -> Self {
        Self {
            arena,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, depth: usize) -> SourcePos {
        SourcePos {
            file: 0,
            line,
            depth,
        }
    }

    fn text(s: &str) -> NodeKind {
        NodeKind::Text(s.to_string())
    }

    #[test]
    fn test_attach_walks_up_to_shallower_ancestor() {
        let mut arena = NodeArena::new();
        let root = arena.insert_root(NodeKind::Mock, pos(0, 0));
        let a = arena.attach(root, text("a"), pos(1, 1)).unwrap();
        let b = arena.attach(a, text("b"), pos(2, 3)).unwrap();
        let c = arena.attach(b, text("c"), pos(3, 2)).unwrap();
        let d = arena.attach(c, text("d"), pos(4, 1)).unwrap();

        assert_eq!(arena.node(root).unwrap().children, vec![a, d]);
        assert_eq!(arena.node(a).unwrap().children, vec![b, c]);
        assert_eq!(arena.node(c).unwrap().parent, Some(a));
        assert_eq!(arena.node(b).unwrap().parent, Some(a));
    }

    #[test]
    fn test_iter_from_is_source_order() {
        let mut arena = NodeArena::new();
        let root = arena.insert_root(NodeKind::Mock, pos(0, 0));
        let mut last = root;
        for (line, depth) in [(1, 1), (2, 2), (3, 3), (4, 2), (5, 1)] {
            last = arena.attach(last, NodeKind::Mock, pos(line, depth)).unwrap();
        }
        let lines: Vec<usize> = arena.iter_from(root).map(|(_, n)| n.pos.line).collect();
        assert_eq!(lines, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_attach_without_shallower_ancestor_is_orphan() {
        let mut arena = NodeArena::new();
        let root = arena.insert_root(NodeKind::Mock, pos(1, 1));
        let err = arena.attach(root, NodeKind::Mock, pos(2, 1)).unwrap_err();
        assert_eq!(err, DomainError::OrphanNode(1));
    }
}
