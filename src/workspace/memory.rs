//! In-memory workspace, for hosts that push state in and for tests.

use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::{Document, Project};
use crate::base::{DocumentId, ProjectId};
use crate::hir::{Compilation, SyntaxTree};

/// A project whose compilation and documents are set explicitly.
///
/// Hosts push state in; discovery only reads it.
pub struct InMemoryProject {
    id: ProjectId,
    name: SmolStr,
    compilation: RwLock<Option<Arc<dyn Compilation>>>,
    /// Documents in insertion order.
    documents: RwLock<IndexMap<DocumentId, Arc<InMemoryDocument>>>,
    this: Weak<InMemoryProject>,
}

impl InMemoryProject {
    /// Create a project with no compilation and no documents.
    pub fn new(id: ProjectId, name: &str) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            id,
            name: SmolStr::new(name),
            compilation: RwLock::new(None),
            documents: RwLock::new(IndexMap::new()),
            this: this.clone(),
        })
    }

    /// Replace the project's compilation.
    pub fn set_compilation(&self, compilation: Option<Arc<dyn Compilation>>) {
        *self.compilation.write() = compilation;
    }

    /// Add (or replace) a document whose syntax tree is `tree`.
    pub fn add_document(&self, tree: SyntaxTree) -> Arc<InMemoryDocument> {
        let document = Arc::new(InMemoryDocument {
            id: tree.document(),
            file_path: Arc::from(tree.file_path()),
            tree: Some(Arc::new(tree)),
            project: self.this.clone(),
        });
        self.documents
            .write()
            .insert(document.id, Arc::clone(&document));
        document
    }

    /// Add a document that has no syntax tree yet.
    pub fn add_unparsed_document(&self, id: DocumentId, file_path: &str) -> Arc<InMemoryDocument> {
        let document = Arc::new(InMemoryDocument {
            id,
            file_path: Arc::from(file_path),
            tree: None,
            project: self.this.clone(),
        });
        self.documents.write().insert(id, Arc::clone(&document));
        document
    }

    /// Remove a document.
    pub fn remove_document(&self, id: DocumentId) -> Option<Arc<InMemoryDocument>> {
        self.documents.write().shift_remove(&id)
    }

    pub fn document(&self, id: DocumentId) -> Option<Arc<InMemoryDocument>> {
        self.documents.read().get(&id).cloned()
    }
}

impl Project for InMemoryProject {
    fn id(&self) -> ProjectId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn compilation(&self, cancel: &CancellationToken) -> Option<Arc<dyn Compilation>> {
        if cancel.is_cancelled() {
            return None;
        }
        self.compilation.read().clone()
    }

    fn documents(&self) -> Vec<Arc<dyn Document>> {
        self.documents
            .read()
            .values()
            .map(|d| Arc::clone(d) as Arc<dyn Document>)
            .collect()
    }
}

/// A document with a fixed syntax tree.
pub struct InMemoryDocument {
    id: DocumentId,
    file_path: Arc<str>,
    tree: Option<Arc<SyntaxTree>>,
    project: Weak<InMemoryProject>,
}

impl Document for InMemoryDocument {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn file_path(&self) -> &str {
        &self.file_path
    }

    fn project(&self) -> Option<Arc<dyn Project>> {
        self.project.upgrade().map(|p| p as Arc<dyn Project>)
    }

    fn syntax_tree(&self, cancel: &CancellationToken) -> Option<Arc<SyntaxTree>> {
        if cancel.is_cancelled() {
            return None;
        }
        self.tree.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::SymbolGraphBuilder;

    #[test]
    fn test_project_documents_in_order() {
        let project = InMemoryProject::new(ProjectId::new(0), "Tests");
        project.add_document(SyntaxTree::new(DocumentId::new(2), "/b.cs"));
        project.add_document(SyntaxTree::new(DocumentId::new(1), "/a.cs"));

        let paths: Vec<_> = project
            .documents()
            .iter()
            .map(|d| d.file_path().to_string())
            .collect();
        assert_eq!(paths, vec!["/b.cs", "/a.cs"]);
    }

    #[test]
    fn test_document_links_back_to_project() {
        let project = InMemoryProject::new(ProjectId::new(3), "Tests");
        let document = project.add_document(SyntaxTree::new(DocumentId::new(0), "/a.cs"));

        let owner = document.project().unwrap();
        assert_eq!(owner.id(), ProjectId::new(3));
        assert_eq!(owner.name(), "Tests");
    }

    #[test]
    fn test_compilation_absent_until_set() {
        let project = InMemoryProject::new(ProjectId::new(0), "Tests");
        let cancel = CancellationToken::new();
        assert!(project.compilation(&cancel).is_none());

        let graph = SymbolGraphBuilder::new("Tests").finish();
        project.set_compilation(Some(Arc::new(graph)));
        assert!(project.compilation(&cancel).is_some());

        cancel.cancel();
        assert!(project.compilation(&cancel).is_none());
    }

    #[test]
    fn test_unparsed_document() {
        let project = InMemoryProject::new(ProjectId::new(0), "Tests");
        let document = project.add_unparsed_document(DocumentId::new(9), "/new.cs");
        assert!(document.syntax_tree(&CancellationToken::new()).is_none());
        assert!(project.remove_document(DocumentId::new(9)).is_some());
        assert!(project.documents().is_empty());
    }
}
