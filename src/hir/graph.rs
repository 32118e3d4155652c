//! In-memory symbol graph: a reference [`Compilation`] backend.
//!
//! Hosts that already have a front end can lower its declarations into a
//! [`SymbolGraph`] with [`SymbolGraphBuilder`]; the test suites use it to
//! describe source code without a real compiler.
//!
//! Conversion rules are the reference-conversion subset both supported
//! languages share: identity, base-class chain, and implemented interfaces
//! (transitively). Under these rules every implicit (C#) or widening (VB)
//! conversion between named types is one of those three.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::compilation::{CSharpConversion, Compilation, SemanticModel, VisualBasicConversion};
use super::symbols::{
    Accessibility, AttributeData, ConstantValue, Language, Symbol, SymbolKind, TypeKind,
};
use super::syntax::SyntaxTree;
use crate::base::{DocumentId, NodeId, SymbolId};

/// Metadata name of the attribute that controls attribute inheritance.
pub const ATTRIBUTE_USAGE_METADATA_NAME: &str = "System.AttributeUsageAttribute";

// ============================================================================
// SYMBOL GRAPH
// ============================================================================

/// An immutable, fully built symbol table.
#[derive(Clone, Debug)]
pub struct SymbolGraph {
    assembly_name: Option<SmolStr>,
    assembly: SymbolId,
    symbols: Vec<Symbol>,
    /// Fully-qualified metadata name -> type.
    by_metadata_name: FxHashMap<SmolStr, SymbolId>,
    /// (document, node) -> declared symbol.
    declarations: FxHashMap<(DocumentId, NodeId), SymbolId>,
}

impl SymbolGraph {
    /// Number of symbols, including the assembly and namespaces.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns true if `destination` is `source`, one of its bases, or an
    /// interface any of them implements.
    fn converts_by_reference(&self, source: SymbolId, destination: SymbolId) -> bool {
        let mut pending = vec![source];
        let mut seen = FxHashSet::default();
        while let Some(current) = pending.pop() {
            if current == destination {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            let Some(symbol) = self.symbols.get(current.index() as usize) else {
                continue;
            };
            pending.extend(symbol.base_type);
            pending.extend(symbol.interfaces.iter().copied());
        }
        false
    }

    fn is_named_type(&self, id: SymbolId) -> bool {
        self.symbol(id).is_some_and(Symbol::is_type)
    }
}

impl Compilation for SymbolGraph {
    fn assembly_name(&self) -> Option<&str> {
        self.assembly_name.as_deref()
    }

    fn assembly(&self) -> SymbolId {
        self.assembly
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index() as usize)
    }

    fn type_by_metadata_name(&self, name: &str) -> Option<SymbolId> {
        self.by_metadata_name.get(name).copied()
    }

    fn classify_csharp_conversion(
        &self,
        source: SymbolId,
        destination: SymbolId,
    ) -> CSharpConversion {
        if !self.is_named_type(source) || !self.is_named_type(destination) {
            return CSharpConversion::none();
        }
        if source == destination {
            return CSharpConversion {
                exists: true,
                is_identity: true,
                is_implicit: true,
            };
        }
        if self.converts_by_reference(source, destination) {
            return CSharpConversion {
                exists: true,
                is_identity: false,
                is_implicit: true,
            };
        }
        // The reverse direction is an explicit (downcast) conversion.
        CSharpConversion {
            exists: self.converts_by_reference(destination, source),
            is_identity: false,
            is_implicit: false,
        }
    }

    fn classify_visual_basic_conversion(
        &self,
        source: SymbolId,
        destination: SymbolId,
    ) -> VisualBasicConversion {
        if !self.is_named_type(source) || !self.is_named_type(destination) {
            return VisualBasicConversion::none();
        }
        if source == destination {
            return VisualBasicConversion {
                exists: true,
                is_identity: true,
                is_widening: true,
                is_narrowing: false,
            };
        }
        if self.converts_by_reference(source, destination) {
            return VisualBasicConversion {
                exists: true,
                is_identity: false,
                is_widening: true,
                is_narrowing: false,
            };
        }
        let narrowing = self.converts_by_reference(destination, source);
        VisualBasicConversion {
            exists: narrowing,
            is_identity: false,
            is_widening: false,
            is_narrowing: narrowing,
        }
    }

    fn semantic_model<'a>(&'a self, tree: &'a SyntaxTree) -> Box<dyn SemanticModel + 'a> {
        Box::new(GraphSemanticModel { graph: self, tree })
    }
}

/// Declared-symbol lookup backed by the graph's declaration table.
struct GraphSemanticModel<'a> {
    graph: &'a SymbolGraph,
    tree: &'a SyntaxTree,
}

impl SemanticModel for GraphSemanticModel<'_> {
    fn declared_symbol(&self, node: NodeId, cancel: &CancellationToken) -> Option<SymbolId> {
        if cancel.is_cancelled() {
            return None;
        }
        self.graph
            .declarations
            .get(&(self.tree.document(), node))
            .copied()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Incrementally constructs a [`SymbolGraph`].
///
/// A new builder already contains the core library types every compilation
/// references: the global namespace, `System`, `System.Object`,
/// `System.Attribute` and `System.AttributeUsageAttribute`.
#[derive(Debug)]
pub struct SymbolGraphBuilder {
    graph: SymbolGraph,
    global_namespace: SymbolId,
    object_type: SymbolId,
    attribute_type: SymbolId,
    attribute_usage_type: SymbolId,
    /// Fully-qualified metadata name of every type added so far.
    full_names: FxHashMap<SymbolId, SmolStr>,
    language: Language,
}

impl SymbolGraphBuilder {
    /// Create a builder for an assembly named `assembly_name`.
    pub fn new(assembly_name: &str) -> Self {
        let mut graph = SymbolGraph {
            assembly_name: Some(SmolStr::new(assembly_name)),
            assembly: SymbolId::new(0),
            symbols: Vec::new(),
            by_metadata_name: FxHashMap::default(),
            declarations: FxHashMap::default(),
        };
        graph
            .symbols
            .push(Symbol::new(SymbolKind::Assembly, assembly_name, Language::CSharp));

        let mut builder = Self {
            graph,
            global_namespace: SymbolId::new(0),
            object_type: SymbolId::new(0),
            attribute_type: SymbolId::new(0),
            attribute_usage_type: SymbolId::new(0),
            full_names: FxHashMap::default(),
            language: Language::CSharp,
        };

        let mut global = Symbol::new(SymbolKind::Namespace, "", Language::CSharp);
        global.containing = Some(builder.graph.assembly);
        builder.global_namespace = builder.push(global);

        let system = builder.namespace_path("System");
        let mut object = Symbol::new(SymbolKind::NamedType, "Object", Language::CSharp);
        object.accessibility = Accessibility::Public;
        object.containing = Some(system);
        builder.object_type = builder.push(object);
        builder.register_metadata_name(system, builder.object_type);

        builder.attribute_type = builder.class(system, "Attribute");
        if let Some(attribute) = builder.symbol_mut(builder.attribute_type) {
            attribute.is_abstract = true;
        }
        builder.attribute_usage_type =
            builder.derived_class(system, "AttributeUsageAttribute", builder.attribute_type);
        builder
    }

    /// Language assigned to symbols created by the convenience methods.
    pub fn set_language(&mut self, language: Language) -> &mut Self {
        self.language = language;
        self
    }

    pub fn assembly(&self) -> SymbolId {
        self.graph.assembly
    }

    pub fn global_namespace(&self) -> SymbolId {
        self.global_namespace
    }

    pub fn object_type(&self) -> SymbolId {
        self.object_type
    }

    pub fn attribute_type(&self) -> SymbolId {
        self.attribute_type
    }

    pub fn attribute_usage_type(&self) -> SymbolId {
        self.attribute_usage_type
    }

    /// Mutable access for adjusting flags after creation.
    pub fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.graph.symbols.get_mut(id.index() as usize)
    }

    fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(self.graph.symbols.len() as u32);
        if let Some(parent) = symbol.containing {
            if let Some(parent) = self.graph.symbols.get_mut(parent.index() as usize) {
                parent.members.push(id);
            }
        }
        self.graph.symbols.push(symbol);
        id
    }

    // ------------------------------------------------------------------------
    // Namespaces
    // ------------------------------------------------------------------------

    /// Find or create a child namespace.
    pub fn namespace(&mut self, parent: SymbolId, name: &str) -> SymbolId {
        let existing = self.graph.symbol(parent).and_then(|p| {
            p.members.iter().copied().find(|&m| {
                self.graph
                    .symbol(m)
                    .is_some_and(|s| s.kind == SymbolKind::Namespace && s.name == name)
            })
        });
        if let Some(id) = existing {
            return id;
        }
        let mut symbol = Symbol::new(SymbolKind::Namespace, name, self.language.clone());
        symbol.containing = Some(parent);
        self.push(symbol)
    }

    /// Find or create a dotted namespace path under the global namespace.
    pub fn namespace_path(&mut self, path: &str) -> SymbolId {
        let mut namespace = self.global_namespace;
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            namespace = self.namespace(namespace, segment);
        }
        namespace
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    /// Add a type declared in `containing` (a namespace or another type).
    ///
    /// Classes and structs without an explicit base get `System.Object`.
    pub fn add_type(&mut self, containing: SymbolId, mut symbol: Symbol) -> SymbolId {
        symbol.kind = SymbolKind::NamedType;
        symbol.containing = Some(containing);
        let class_like = matches!(symbol.type_kind, TypeKind::Class | TypeKind::Struct);
        if class_like && symbol.base_type.is_none() {
            symbol.base_type = Some(self.object_type);
        }
        let id = self.push(symbol);
        self.register_metadata_name(containing, id);
        id
    }

    fn register_metadata_name(&mut self, containing: SymbolId, id: SymbolId) {
        let Some(own) = self.graph.symbol(id).map(|s| s.metadata_name.clone()) else {
            return;
        };
        let prefix = match self.graph.symbol(containing).map(|s| s.kind) {
            Some(SymbolKind::NamedType) => self
                .full_names
                .get(&containing)
                .map(|name| format!("{name}+")),
            Some(SymbolKind::Namespace) => {
                let mut segments = Vec::new();
                let mut current = Some(containing);
                while let Some(ns) = current.and_then(|c| self.graph.symbol(c)) {
                    if ns.kind != SymbolKind::Namespace {
                        break;
                    }
                    if !ns.name.is_empty() {
                        segments.push(ns.name.clone());
                    }
                    current = ns.containing;
                }
                segments.reverse();
                (!segments.is_empty()).then(|| format!("{}.", segments.join(".")))
            }
            _ => None,
        };
        let full = SmolStr::new(format!("{}{own}", prefix.unwrap_or_default()));
        self.graph.by_metadata_name.insert(full.clone(), id);
        self.full_names.insert(id, full);
    }

    /// Add a public class deriving from `System.Object`.
    pub fn class(&mut self, containing: SymbolId, name: &str) -> SymbolId {
        let mut symbol = Symbol::new(SymbolKind::NamedType, name, self.language.clone());
        symbol.accessibility = Accessibility::Public;
        self.add_type(containing, symbol)
    }

    /// Add a public class deriving from `base`.
    pub fn derived_class(&mut self, containing: SymbolId, name: &str, base: SymbolId) -> SymbolId {
        let mut symbol = Symbol::new(SymbolKind::NamedType, name, self.language.clone());
        symbol.accessibility = Accessibility::Public;
        symbol.base_type = Some(base);
        self.add_type(containing, symbol)
    }

    /// Add a public interface.
    pub fn interface(&mut self, containing: SymbolId, name: &str) -> SymbolId {
        let mut symbol = Symbol::new(SymbolKind::NamedType, name, self.language.clone());
        symbol.accessibility = Accessibility::Public;
        symbol.type_kind = TypeKind::Interface;
        symbol.is_abstract = true;
        self.add_type(containing, symbol)
    }

    /// Add a public attribute class deriving from `base` (or
    /// `System.Attribute`).
    ///
    /// `inherited` adds `[AttributeUsage(..., Inherited = value)]`; `None`
    /// leaves the usage unspecified, which means inherited.
    pub fn attribute_class(
        &mut self,
        containing: SymbolId,
        name: &str,
        base: Option<SymbolId>,
        inherited: Option<bool>,
    ) -> SymbolId {
        let id = self.derived_class(containing, name, base.unwrap_or(self.attribute_type));
        if let Some(inherited) = inherited {
            let usage = AttributeData::new(self.attribute_usage_type)
                .with_argument(ConstantValue::Int(32767))
                .with_named("Inherited", ConstantValue::Bool(inherited));
            self.apply(id, usage);
        }
        id
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    /// Add a method to `ty`.
    pub fn add_method(&mut self, ty: SymbolId, mut symbol: Symbol) -> SymbolId {
        symbol.kind = SymbolKind::Method;
        symbol.containing = Some(ty);
        self.push(symbol)
    }

    /// Add a public method.
    pub fn method(&mut self, ty: SymbolId, name: &str) -> SymbolId {
        let mut symbol = Symbol::new(SymbolKind::Method, name, self.language.clone());
        symbol.accessibility = Accessibility::Public;
        self.add_method(ty, symbol)
    }

    /// Add a public method overriding `overridden`.
    pub fn override_method(&mut self, ty: SymbolId, name: &str, overridden: SymbolId) -> SymbolId {
        let mut symbol = Symbol::new(SymbolKind::Method, name, self.language.clone());
        symbol.accessibility = Accessibility::Public;
        symbol.overridden_method = Some(overridden);
        self.add_method(ty, symbol)
    }

    /// Add a parameter to `method`.
    pub fn parameter(&mut self, method: SymbolId, name: &str, ty: Option<SymbolId>) -> SymbolId {
        let mut symbol = Symbol::new(SymbolKind::Parameter, name, self.language.clone());
        symbol.containing = Some(method);
        symbol.parameter_type = ty;
        let id = SymbolId::new(self.graph.symbols.len() as u32);
        self.graph.symbols.push(symbol);
        if let Some(owner) = self.symbol_mut(method) {
            owner.parameters.push(id);
        }
        id
    }

    /// Apply an attribute to any symbol (including the assembly).
    pub fn apply(&mut self, target: SymbolId, attribute: AttributeData) -> &mut Self {
        if let Some(symbol) = self.symbol_mut(target) {
            symbol.attributes.push(attribute);
        }
        self
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    /// Record that `node` in `document` declares `symbol`.
    pub fn declare(&mut self, document: DocumentId, node: NodeId, symbol: SymbolId) -> &mut Self {
        self.graph.declarations.insert((document, node), symbol);
        self
    }

    /// Finish building.
    pub fn finish(self) -> SymbolGraph {
        self.graph
    }
}
