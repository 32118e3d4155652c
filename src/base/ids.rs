//! Identifiers for symbols, syntax nodes, documents and projects.

use std::fmt;

/// A handle to a symbol inside one compilation.
///
/// `SymbolId` is a lightweight handle (just a u32). The symbol itself lives
/// in the compilation that issued the handle; handles from different
/// compilations must not be mixed.
///
/// Using `SymbolId` instead of references throughout the adapters:
/// - Makes identity comparison O(1)
/// - Keeps adapters free of borrows into the compiler's symbol table
/// - Enables cheap copying and hashing (override sets, attribute class sets)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Create a new SymbolId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

impl From<u32> for SymbolId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A node inside one [`SyntaxTree`](crate::hir::SyntaxTree).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Identifies a source document within the workspace.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DocumentId(pub u32);

impl DocumentId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document#{}", self.0)
    }
}

/// Identifies a project within the workspace.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProjectId(pub u32);

impl ProjectId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectId({})", self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "project#{}", self.0)
    }
}
