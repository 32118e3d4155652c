//! Source-based [`TypeInfo`].

use std::sync::Arc;

use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet;

use super::attributes::matching_attributes;
use super::context::CompilationContext;
use super::method::SourceMethodInfo;
use crate::base::SymbolId;
use crate::hir::{Compilation, DisplayPart, DisplayPartKind, Hierarchy, SymbolKind};
use crate::reflect::{
    AssemblyInfo, AttributeInfo, MethodInfo, ReflectError, ReflectResult, TypeInfo,
};

/// Render a type's fully-qualified name the way runtime metadata does.
///
/// `N.Outer.Inner` renders as `N.Outer+Inner`.
pub fn qualified_type_name(compilation: &dyn Compilation, ty: SymbolId) -> String {
    render_metadata_name(&compilation.display_parts(ty))
}

/// Namespace qualification is kept as the compiler renders it; every
/// separator after the first type segment is a containing-type boundary and
/// becomes `+`.
pub fn render_metadata_name(parts: &[DisplayPart]) -> String {
    let mut name = String::new();
    let mut in_type = false;
    for part in parts {
        in_type |= part.kind == DisplayPartKind::TypeName;
        if in_type && is_separator(part.kind) {
            name.push('+');
        } else {
            name.push_str(&part.text);
        }
    }
    name
}

fn is_separator(kind: DisplayPartKind) -> bool {
    match kind {
        DisplayPartKind::Operator | DisplayPartKind::Punctuation => true,
        DisplayPartKind::NamespaceName | DisplayPartKind::TypeName => false,
    }
}

/// A view over one named-type symbol.
pub struct SourceTypeInfo {
    context: Arc<CompilationContext>,
    symbol: SymbolId,
    qualified_name: OnceCell<String>,
}

impl SourceTypeInfo {
    pub fn new(context: Arc<CompilationContext>, symbol: SymbolId) -> Self {
        Self {
            context,
            symbol,
            qualified_name: OnceCell::new(),
        }
    }

    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    /// Methods visible through this type, most-derived level first.
    ///
    /// Walks the type and each base (root object type excluded). A method
    /// overridden at a more-derived level is skipped, so every override
    /// chain is reported once, at its most-derived declaration.
    pub fn method_symbols(&self, include_private_methods: bool) -> Vec<SymbolId> {
        let compilation = self.context.compilation();
        let mut methods = Vec::new();
        // Methods some more-derived level already overrides.
        let mut overridden = FxHashSet::default();

        for level in Hierarchy::from(compilation, self.symbol) {
            let Some(ty) = compilation.symbol(level) else {
                continue;
            };
            for &member in &ty.members {
                let Some(method) = compilation.symbol(member) else {
                    continue;
                };
                if method.kind != SymbolKind::Method {
                    continue;
                }
                if !include_private_methods && !method.is_public() {
                    continue;
                }
                if let Some(base) = method.overridden_method {
                    if !overridden.insert(base) {
                        continue;
                    }
                }
                if overridden.contains(&member) {
                    continue;
                }
                methods.push(member);
            }
        }
        methods
    }
}

impl TypeInfo for SourceTypeInfo {
    fn assembly(&self) -> Option<Arc<dyn AssemblyInfo>> {
        self.context.assembly()
    }

    fn base_type(&self) -> ReflectResult<Option<Arc<dyn TypeInfo>>> {
        Err(ReflectError::unsupported("TypeInfo::base_type"))
    }

    fn interfaces(&self) -> ReflectResult<Vec<Arc<dyn TypeInfo>>> {
        Err(ReflectError::unsupported("TypeInfo::interfaces"))
    }

    fn is_abstract(&self) -> bool {
        self.context
            .symbol(self.symbol)
            .is_some_and(|s| s.is_abstract)
    }

    fn is_generic_parameter(&self) -> ReflectResult<bool> {
        Err(ReflectError::unsupported("TypeInfo::is_generic_parameter"))
    }

    fn is_generic_type(&self) -> ReflectResult<bool> {
        Err(ReflectError::unsupported("TypeInfo::is_generic_type"))
    }

    fn is_sealed(&self) -> bool {
        self.context
            .symbol(self.symbol)
            .is_some_and(|s| s.is_sealed)
    }

    fn is_value_type(&self) -> ReflectResult<bool> {
        Err(ReflectError::unsupported("TypeInfo::is_value_type"))
    }

    fn name(&self) -> &str {
        self.qualified_name
            .get_or_init(|| qualified_type_name(self.context.compilation(), self.symbol))
    }

    fn custom_attributes(
        &self,
        assembly_qualified_attribute_type_name: &str,
    ) -> Vec<Arc<dyn AttributeInfo>> {
        matching_attributes(
            &self.context,
            self.symbol,
            assembly_qualified_attribute_type_name,
        )
    }

    fn generic_arguments(&self) -> ReflectResult<Vec<Arc<dyn TypeInfo>>> {
        Err(ReflectError::unsupported("TypeInfo::generic_arguments"))
    }

    fn method(
        &self,
        _method_name: &str,
        _include_private_method: bool,
    ) -> ReflectResult<Option<Arc<dyn MethodInfo>>> {
        Err(ReflectError::unsupported("TypeInfo::method"))
    }

    fn methods(&self, include_private_methods: bool) -> Vec<Arc<dyn MethodInfo>> {
        self.method_symbols(include_private_methods)
            .into_iter()
            .map(|method| {
                Arc::new(SourceMethodInfo::new(Arc::clone(&self.context), method))
                    as Arc<dyn MethodInfo>
            })
            .collect()
    }
}

impl std::fmt::Debug for SourceTypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceTypeInfo")
            .field("symbol", &self.symbol)
            .field("name", &self.name())
            .finish()
    }
}
