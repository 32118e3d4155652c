//! Workspace collaborator: documents and projects owned by the editor.
//!
//! The bridge never decides which documents exist or when compilations are
//! rebuilt; it only asks. Both accessors may block while the host computes
//! the answer, and both may come back empty.

mod memory;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::base::{DocumentId, ProjectId};
use crate::hir::{Compilation, SyntaxTree};

pub use memory::{InMemoryDocument, InMemoryProject};

/// What one discovery pass analyzes.
#[derive(Clone)]
pub enum AnalysisScope {
    /// A single document, analyzed against its project's compilation.
    Document(Arc<dyn Document>),
    /// Every document of a project.
    Project(Arc<dyn Project>),
}

impl AnalysisScope {
    /// The compilation the scope is analyzed against.
    pub fn compilation(&self, cancel: &CancellationToken) -> Option<Arc<dyn Compilation>> {
        match self {
            AnalysisScope::Document(document) => document.project()?.compilation(cancel),
            AnalysisScope::Project(project) => project.compilation(cancel),
        }
    }

    /// The syntax trees in scope; documents without a tree are skipped.
    pub fn syntax_trees(&self, cancel: &CancellationToken) -> Vec<Arc<SyntaxTree>> {
        match self {
            AnalysisScope::Document(document) => document.syntax_tree(cancel).into_iter().collect(),
            AnalysisScope::Project(project) => project
                .documents()
                .iter()
                .filter_map(|document| document.syntax_tree(cancel))
                .collect(),
        }
    }
}

impl std::fmt::Debug for AnalysisScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisScope::Document(document) => {
                f.debug_tuple("Document").field(&document.id()).finish()
            }
            AnalysisScope::Project(project) => {
                f.debug_tuple("Project").field(&project.id()).finish()
            }
        }
    }
}

/// A project: a compilation plus the documents that feed it.
pub trait Project: Send + Sync {
    fn id(&self) -> ProjectId;

    fn name(&self) -> &str;

    /// The project's current compilation, or `None` if none is available
    /// (not loaded yet, or the request was cancelled).
    fn compilation(&self, cancel: &CancellationToken) -> Option<Arc<dyn Compilation>>;

    /// Source documents, in project order.
    fn documents(&self) -> Vec<Arc<dyn Document>>;
}

/// One source document.
pub trait Document: Send + Sync {
    fn id(&self) -> DocumentId;

    fn file_path(&self) -> &str;

    /// The project the document belongs to.
    fn project(&self) -> Option<Arc<dyn Project>>;

    /// The document's syntax tree, or `None` if it is not available.
    fn syntax_tree(&self, cancel: &CancellationToken) -> Option<Arc<SyntaxTree>>;
}
