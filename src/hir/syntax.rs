//! Syntax trees as seen by the bridge.
//!
//! The bridge never inspects tokens; it only needs the declaration
//! skeleton of a document so it can ask the semantic model which symbol
//! each node declares.

use std::sync::Arc;

use crate::base::{DocumentId, NodeId};

/// Coarse node classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    CompilationUnit,
    NamespaceDeclaration,
    TypeDeclaration,
    MemberDeclaration,
    Other,
}

/// A node in a [`SyntaxTree`].
#[derive(Clone, Debug)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    children: Vec<NodeId>,
}

impl SyntaxNode {
    /// Child nodes, in source order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An arena-allocated syntax tree for one document.
///
/// Node 0 is always the compilation-unit root.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    document: DocumentId,
    file_path: Arc<str>,
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Create a tree containing only the root node.
    pub fn new(document: DocumentId, file_path: impl Into<Arc<str>>) -> Self {
        Self {
            document,
            file_path: file_path.into(),
            nodes: vec![SyntaxNode {
                kind: SyntaxKind::CompilationUnit,
                children: Vec::new(),
            }],
        }
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Append a node under `parent`.
    ///
    /// Returns `None` if `parent` does not belong to this tree.
    pub fn add_node(&mut self, parent: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes
            .get_mut(parent.index() as usize)?
            .children
            .push(id);
        self.nodes.push(SyntaxNode {
            kind,
            children: Vec::new(),
        });
        Some(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index() as usize)
    }

    /// Children of `id`; empty for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(SyntaxNode::children).unwrap_or_default()
    }

    /// The root's direct children.
    pub fn top_level_nodes(&self) -> &[NodeId] {
        self.children(self.root())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root is always present.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_structure() {
        let mut tree = SyntaxTree::new(DocumentId::new(0), "/src/Tests.cs");
        let ns = tree
            .add_node(tree.root(), SyntaxKind::NamespaceDeclaration)
            .unwrap();
        let ty = tree.add_node(ns, SyntaxKind::TypeDeclaration).unwrap();
        let member = tree.add_node(ty, SyntaxKind::MemberDeclaration).unwrap();

        assert_eq!(tree.top_level_nodes(), &[ns]);
        assert_eq!(tree.children(ns), &[ty]);
        assert_eq!(tree.children(ty), &[member]);
        assert!(tree.children(member).is_empty());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_unknown_parent() {
        let mut tree = SyntaxTree::new(DocumentId::new(0), "/src/Tests.cs");
        assert!(tree.add_node(NodeId::new(42), SyntaxKind::Other).is_none());
        assert!(tree.children(NodeId::new(42)).is_empty());
    }
}
