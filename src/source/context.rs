//! Compilation context: one semantic session plus its lookup cache.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::SymbolId;
use crate::hir::{Compilation, Language, SemanticModel, Symbol, SyntaxTree};
use crate::reflect::AssemblyInfo;

/// Caches lookups performed against one [`Compilation`].
///
/// A context lives for one discovery pass. Every adapter handed to the
/// discovery engine shares it.
pub struct CompilationContext {
    compilation: Arc<dyn Compilation>,
    assembly: Weak<dyn AssemblyInfo>,
    /// Metadata name -> resolved type. Misses are cached as `None`.
    /// Thread-safe via internal locking; entries are never invalidated.
    types_by_metadata_name: RwLock<FxHashMap<SmolStr, Option<SymbolId>>>,
}

impl CompilationContext {
    /// Create a context owned by `assembly`.
    pub fn new(compilation: Arc<dyn Compilation>, assembly: Weak<dyn AssemblyInfo>) -> Self {
        Self {
            compilation,
            assembly,
            types_by_metadata_name: RwLock::new(FxHashMap::default()),
        }
    }

    /// The assembly adapter this context belongs to, while it is alive.
    pub fn assembly(&self) -> Option<Arc<dyn AssemblyInfo>> {
        self.assembly.upgrade()
    }

    pub fn assembly_name(&self) -> Option<&str> {
        self.compilation.assembly_name()
    }

    pub fn assembly_symbol(&self) -> SymbolId {
        self.compilation.assembly()
    }

    pub fn compilation(&self) -> &dyn Compilation {
        self.compilation.as_ref()
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.compilation.symbol(id)
    }

    pub fn semantic_model<'a>(&'a self, tree: &'a SyntaxTree) -> Box<dyn SemanticModel + 'a> {
        self.compilation.semantic_model(tree)
    }

    /// Resolve a fully-qualified metadata name, memoizing the answer.
    ///
    /// The underlying compilation is asked at most once per name for the
    /// lifetime of this context, whether or not the type exists.
    pub fn type_by_metadata_name(&self, name: &str) -> Option<SymbolId> {
        // Fast path: already resolved (read lock)
        {
            let cache = self.types_by_metadata_name.read();
            if let Some(&resolved) = cache.get(name) {
                return resolved;
            }
        }

        // Slow path: resolve and insert (write lock)
        let mut cache = self.types_by_metadata_name.write();

        // Double-check after acquiring write lock
        if let Some(&resolved) = cache.get(name) {
            return resolved;
        }

        let resolved = self.compilation.type_by_metadata_name(name);
        tracing::trace!(name, found = resolved.is_some(), "type lookup cache miss");
        cache.insert(SmolStr::new(name), resolved);
        resolved
    }

    /// Whether a value of type `source` can be used where `destination` is
    /// expected, by the rules of the language `source` was declared in.
    ///
    /// Symbols from languages without conversion rules are never assignable.
    pub fn is_assignable_to(&self, source: SymbolId, destination: SymbolId) -> bool {
        let Some(symbol) = self.compilation.symbol(source) else {
            return false;
        };
        match symbol.language {
            Language::CSharp => {
                self.compilation
                    .classify_csharp_conversion(source, destination)
                    .is_implicit
            }
            Language::VisualBasic => {
                self.compilation
                    .classify_visual_basic_conversion(source, destination)
                    .is_widening
            }
            Language::Other(_) => false,
        }
    }

    /// Number of names resolved so far (hits and misses).
    pub fn cached_type_count(&self) -> usize {
        self.types_by_metadata_name.read().len()
    }
}

impl std::fmt::Debug for CompilationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationContext")
            .field("assembly_name", &self.assembly_name())
            .field("cached_types", &self.cached_type_count())
            .finish()
    }
}
