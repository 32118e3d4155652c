//! The compiler collaborator: a semantic-analysis session.
//!
//! [`Compilation`] is the only window the bridge has into the compiler.
//! Everything is addressed by [`SymbolId`]; the implementor owns the
//! symbol table and decides how conversions are classified.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::symbols::{Symbol, SymbolKind};
use super::syntax::SyntaxTree;
use crate::base::{NodeId, SymbolId};

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Result of classifying a conversion under C# rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CSharpConversion {
    pub exists: bool,
    pub is_identity: bool,
    pub is_implicit: bool,
}

impl CSharpConversion {
    /// No conversion exists.
    pub const fn none() -> Self {
        Self {
            exists: false,
            is_identity: false,
            is_implicit: false,
        }
    }
}

/// Result of classifying a conversion under Visual Basic rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisualBasicConversion {
    pub exists: bool,
    pub is_identity: bool,
    pub is_widening: bool,
    pub is_narrowing: bool,
}

impl VisualBasicConversion {
    /// No conversion exists.
    pub const fn none() -> Self {
        Self {
            exists: false,
            is_identity: false,
            is_widening: false,
            is_narrowing: false,
        }
    }
}

// ============================================================================
// DISPLAY PARTS
// ============================================================================

/// Classification of a [`DisplayPart`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayPartKind {
    NamespaceName,
    TypeName,
    Punctuation,
    Operator,
}

/// One segment of a symbol rendered for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayPart {
    pub kind: DisplayPartKind,
    pub text: SmolStr,
}

impl DisplayPart {
    pub fn new(kind: DisplayPartKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn dot() -> Self {
        Self::new(DisplayPartKind::Punctuation, ".")
    }
}

// ============================================================================
// COMPILATION
// ============================================================================

/// Declared-symbol lookup for the nodes of one syntax tree.
pub trait SemanticModel {
    /// The namespace, type or member a node declares, if any.
    ///
    /// Returns `None` once `cancel` has fired.
    fn declared_symbol(&self, node: NodeId, cancel: &CancellationToken) -> Option<SymbolId>;
}

/// A semantic-analysis session over a set of source documents.
pub trait Compilation: Send + Sync {
    /// The name of the assembly this compilation would produce.
    fn assembly_name(&self) -> Option<&str>;

    /// The assembly symbol (carries assembly-level attributes).
    fn assembly(&self) -> SymbolId;

    /// Look up a symbol by handle.
    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    /// Resolve a fully-qualified metadata name (`N.Outer+Inner`).
    ///
    /// Uncached; callers that repeat lookups should go through a
    /// [`CompilationContext`](crate::source::CompilationContext).
    fn type_by_metadata_name(&self, name: &str) -> Option<SymbolId>;

    /// Classify `source → destination` using C# rules.
    fn classify_csharp_conversion(
        &self,
        source: SymbolId,
        destination: SymbolId,
    ) -> CSharpConversion;

    /// Classify `source → destination` using Visual Basic rules.
    fn classify_visual_basic_conversion(
        &self,
        source: SymbolId,
        destination: SymbolId,
    ) -> VisualBasicConversion;

    /// A semantic model bound to `tree`.
    fn semantic_model<'a>(&'a self, tree: &'a SyntaxTree) -> Box<dyn SemanticModel + 'a>;

    /// Render a type as namespace and containing-type qualified parts.
    ///
    /// The default implementation walks `containing` links and separates
    /// every segment with `.` punctuation. The global namespace is omitted.
    fn display_parts(&self, ty: SymbolId) -> Vec<DisplayPart> {
        let mut chain = Vec::new();
        let mut current = Some(ty);
        while let Some(id) = current {
            let Some(symbol) = self.symbol(id) else {
                break;
            };
            let kind = match symbol.kind {
                SymbolKind::NamedType => Some(DisplayPartKind::TypeName),
                // The global namespace is unnamed.
                SymbolKind::Namespace if symbol.name.is_empty() => None,
                SymbolKind::Namespace => Some(DisplayPartKind::NamespaceName),
                _ => None,
            };
            if let Some(kind) = kind {
                chain.push(DisplayPart::new(kind, symbol.name.clone()));
            }
            current = symbol.containing;
        }
        chain.reverse();

        let mut parts = Vec::with_capacity(chain.len() * 2);
        for (i, part) in chain.into_iter().enumerate() {
            if i > 0 {
                parts.push(DisplayPart::dot());
            }
            parts.push(part);
        }
        parts
    }
}

// ============================================================================
// NAVIGATION
// ============================================================================

/// Walks a type hierarchy upward, stopping before the root object type.
///
/// Each yielded level is a type that itself has a base type; the root
/// object type (the only class without one) is never yielded. A cyclic
/// hierarchy in half-typed source terminates at the first repeat.
pub struct Hierarchy<'a> {
    compilation: &'a dyn Compilation,
    next: Option<SymbolId>,
    seen: FxHashSet<SymbolId>,
}

impl<'a> Hierarchy<'a> {
    /// Start the walk at `start` itself.
    pub fn from(compilation: &'a dyn Compilation, start: SymbolId) -> Self {
        Self {
            compilation,
            next: Some(start),
            seen: FxHashSet::default(),
        }
    }

    /// Start the walk at the base type of `ty`.
    pub fn above(compilation: &'a dyn Compilation, ty: SymbolId) -> Self {
        let next = compilation.symbol(ty).and_then(|s| s.base_type);
        Self {
            compilation,
            next,
            seen: FxHashSet::default(),
        }
    }
}

impl Iterator for Hierarchy<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        let current = self.next.take()?;
        let base = self.compilation.symbol(current)?.base_type?;
        if !self.seen.insert(current) {
            return None;
        }
        self.next = Some(base);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::SymbolGraphBuilder;

    #[test]
    fn test_hierarchy_excludes_root() {
        let mut builder = SymbolGraphBuilder::new("Tests");
        let ns = builder.namespace_path("N");
        let a = builder.class(ns, "A");
        let b = builder.derived_class(ns, "B", a);
        let graph = builder.finish();

        let levels: Vec<_> = Hierarchy::from(&graph, b).collect();
        assert_eq!(levels, vec![b, a]);

        let above: Vec<_> = Hierarchy::above(&graph, b).collect();
        assert_eq!(above, vec![a]);
    }

    #[test]
    fn test_hierarchy_stops_on_cycle() {
        let mut builder = SymbolGraphBuilder::new("Tests");
        let ns = builder.namespace_path("N");
        let a = builder.class(ns, "A");
        let b = builder.derived_class(ns, "B", a);
        builder.symbol_mut(a).unwrap().base_type = Some(b);
        let graph = builder.finish();

        let levels: Vec<_> = Hierarchy::from(&graph, b).collect();
        assert_eq!(levels, vec![b, a]);
    }

    #[test]
    fn test_default_display_parts() {
        let mut builder = SymbolGraphBuilder::new("Tests");
        let ns = builder.namespace_path("Company.Product");
        let outer = builder.class(ns, "Outer");
        let inner = builder.class(outer, "Inner");
        let graph = builder.finish();

        let rendered: String = graph
            .display_parts(inner)
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(rendered, "Company.Product.Outer.Inner");
        let first = &graph.display_parts(inner)[0];
        assert_eq!(first.kind, DisplayPartKind::NamespaceName);
    }
}
