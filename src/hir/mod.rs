//! High-level IR: the compiler's static view of the program.
//!
//! This module defines the compiler collaborator the bridge consumes:
//!
//! - [`Symbol`] and friends - plain symbol records addressed by [`SymbolId`](crate::base::SymbolId)
//! - [`Compilation`] - a semantic-analysis session (lookups, conversions, display)
//! - [`SemanticModel`] - declared-symbol lookup per syntax node
//! - [`SyntaxTree`] - the declaration skeleton of one document
//! - [`SymbolGraph`] - an in-memory [`Compilation`] implementation

mod compilation;
mod graph;
mod symbols;
mod syntax;

pub use compilation::{
    CSharpConversion, Compilation, DisplayPart, DisplayPartKind, Hierarchy, SemanticModel,
    VisualBasicConversion,
};
pub use graph::{ATTRIBUTE_USAGE_METADATA_NAME, SymbolGraph, SymbolGraphBuilder};
pub use symbols::{
    Accessibility, AttributeData, ConstantValue, Language, Symbol, SymbolKind, TypeKind,
    TypedConstant,
};
pub use syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
