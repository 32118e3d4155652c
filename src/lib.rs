//! # source-discovery
//!
//! Find tests in source code that has not been built yet.
//!
//! A test-discovery engine normally reflects over a compiled assembly. This
//! crate gives it the same reflection surface backed by a compiler's static
//! symbol graph instead, so discovery can run on in-progress edits.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! discovery → Orchestrator: drives an engine, reports host test cases
//!   ↓
//! engine    → Engine collaborator: request/result shapes, results sink
//!   ↓
//! source    → Reflection adapters over symbols, attribute inheritance
//!   ↓
//! reflect   → Reflection surface the engine consumes
//!   ↓
//! workspace → Documents and projects (editor collaborator)
//!   ↓
//! hir       → Compiler collaborator: symbols, compilations, syntax trees
//!   ↓
//! base      → Primitives (SymbolId, NodeId, DocumentId, ProjectId)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use source_discovery::{
//!     DiscoveryContext, FactEngine, InMemoryProject, ProjectId, SourceTestDiscoverer,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! let project = InMemoryProject::new(ProjectId::new(0), "Sample.Tests");
//! let context = DiscoveryContext::project(
//!     project,
//!     |test| println!("{}", test.fully_qualified_name),
//!     "/bin/Debug/Sample.Tests.dll",
//!     CancellationToken::new(),
//! );
//! let outcome = SourceTestDiscoverer::new(FactEngine::new()).analyze_project(&context);
//! ```

// ============================================================================
// FOUNDATION
// ============================================================================

/// Foundation types: symbol, node, document and project handles
pub mod base;

/// Compiler collaborator: symbol records, compilation and semantic model traits
pub mod hir;

/// Editor collaborator: documents, projects, analysis scopes
pub mod workspace;

// ============================================================================
// REFLECTION BRIDGE
// ============================================================================

/// Reflection surface consumed by discovery engines
pub mod reflect;

/// Source-backed reflection adapters
pub mod source;

// ============================================================================
// DISCOVERY
// ============================================================================

/// Discovery engine collaborator and the reference xUnit-style engine
pub mod engine;

/// Discovery orchestration and host-side test cases
pub mod discovery;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly needed items
pub use base::{DocumentId, NodeId, ProjectId, SymbolId};
pub use discovery::{
    DiscovererOptions, DiscoveryContext, DiscoveryError, DiscoveryOutcome, ReportError,
    SourceTestDiscoverer, TestCase, Trait,
};
pub use engine::{DiscoveryEngine, DiscoverySink, FactEngine};
pub use hir::{Compilation, SymbolGraph, SymbolGraphBuilder};
pub use reflect::{
    ArgumentValue, AssemblyInfo, AttributeInfo, MethodInfo, ParameterInfo, ReflectError, TypeInfo,
};
pub use source::{CompilationContext, SourceAssemblyInfo};
pub use workspace::{AnalysisScope, Document, InMemoryDocument, InMemoryProject, Project};
