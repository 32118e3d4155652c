//! Source-based [`AssemblyInfo`] over a document or project scope.

use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::attributes::matching_attributes;
use super::context::CompilationContext;
use super::type_info::SourceTypeInfo;
use crate::base::{NodeId, SymbolId};
use crate::hir::{SemanticModel, SymbolKind, SyntaxTree};
use crate::reflect::{AssemblyInfo, AttributeInfo, ReflectError, ReflectResult, TypeInfo};
use crate::workspace::AnalysisScope;

/// The "assembly" a discovery engine inspects: whatever the analysis scope
/// declares, read straight from source.
///
/// The compilation is acquired on first use and kept for the lifetime of
/// the adapter. A failed acquisition is cached too; it is never retried.
pub struct SourceAssemblyInfo {
    scope: AnalysisScope,
    cancel: CancellationToken,
    context: OnceCell<Option<Arc<CompilationContext>>>,
    public_types: OnceCell<Vec<Arc<dyn TypeInfo>>>,
    this: Weak<SourceAssemblyInfo>,
}

impl SourceAssemblyInfo {
    pub fn new(scope: AnalysisScope, cancel: CancellationToken) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            scope,
            cancel,
            context: OnceCell::new(),
            public_types: OnceCell::new(),
            this: this.clone(),
        })
    }

    pub fn scope(&self) -> &AnalysisScope {
        &self.scope
    }

    /// The compilation context, or `None` if the scope has no compilation.
    pub fn context(&self) -> Option<&Arc<CompilationContext>> {
        self.context
            .get_or_init(|| {
                let compilation = self.scope.compilation(&self.cancel);
                debug!(
                    scope = ?self.scope,
                    available = compilation.is_some(),
                    "acquired compilation"
                );
                compilation.map(|compilation| {
                    let owner: Weak<dyn AssemblyInfo> = self.this.clone();
                    Arc::new(CompilationContext::new(compilation, owner))
                })
            })
            .as_ref()
    }

    fn collect_types(&self, include_private_types: bool) -> Vec<Arc<dyn TypeInfo>> {
        let Some(context) = self.context() else {
            return Vec::new();
        };
        let mut walk = TypeWalk {
            context,
            cancel: &self.cancel,
            include_private_types,
            seen: FxHashSet::default(),
            found: Vec::new(),
        };
        for tree in self.scope.syntax_trees(&self.cancel) {
            if self.cancel.is_cancelled() {
                break;
            }
            let model = context.semantic_model(&tree);
            walk.visit(&tree, model.as_ref(), tree.top_level_nodes());
        }
        walk.found
    }
}

/// Depth-first walk over declaration nodes.
struct TypeWalk<'a> {
    context: &'a Arc<CompilationContext>,
    cancel: &'a CancellationToken,
    include_private_types: bool,
    /// Partial types are declared once per part.
    seen: FxHashSet<SymbolId>,
    found: Vec<Arc<dyn TypeInfo>>,
}

impl TypeWalk<'_> {
    fn visit(&mut self, tree: &SyntaxTree, model: &dyn SemanticModel, nodes: &[NodeId]) {
        for &node in nodes {
            if self.cancel.is_cancelled() {
                return;
            }
            let Some(declared) = model.declared_symbol(node, self.cancel) else {
                continue;
            };
            let Some(kind) = self.context.symbol(declared).map(|s| s.kind) else {
                continue;
            };
            if kind == SymbolKind::NamedType
                && (self.include_private_types || self.is_effectively_public(declared))
                && self.seen.insert(declared)
            {
                self.found.push(Arc::new(SourceTypeInfo::new(
                    Arc::clone(self.context),
                    declared,
                )));
            }
            if kind.is_namespace_or_type() {
                self.visit(tree, model, tree.children(node));
            }
        }
    }

    /// A type is public only if it and every containing type are public.
    fn is_effectively_public(&self, ty: SymbolId) -> bool {
        let mut current = Some(ty);
        while let Some(symbol) = current.and_then(|id| self.context.symbol(id)) {
            if symbol.kind != SymbolKind::NamedType {
                break;
            }
            if !symbol.is_public() {
                return false;
            }
            current = symbol.containing;
        }
        true
    }
}

impl AssemblyInfo for SourceAssemblyInfo {
    fn assembly_path(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> Option<String> {
        self.context()?.assembly_name().map(str::to_string)
    }

    fn custom_attributes(
        &self,
        assembly_qualified_attribute_type_name: &str,
    ) -> Vec<Arc<dyn AttributeInfo>> {
        match self.context() {
            Some(context) => matching_attributes(
                context,
                context.assembly_symbol(),
                assembly_qualified_attribute_type_name,
            ),
            None => Vec::new(),
        }
    }

    fn get_type(&self, _type_name: &str) -> ReflectResult<Option<Arc<dyn TypeInfo>>> {
        Err(ReflectError::unsupported("AssemblyInfo::get_type"))
    }

    fn types(&self, include_private_types: bool) -> Vec<Arc<dyn TypeInfo>> {
        if include_private_types {
            return self.collect_types(true);
        }
        if let Some(types) = self.public_types.get() {
            return types.clone();
        }
        let types = self.collect_types(false);
        // A cancelled walk is partial; leave the cache empty.
        if !self.cancel.is_cancelled() {
            let _ = self.public_types.set(types.clone());
        }
        types
    }
}

impl std::fmt::Debug for SourceAssemblyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceAssemblyInfo")
            .field("scope", &self.scope)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
