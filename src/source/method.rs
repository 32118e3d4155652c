//! Source-based [`MethodInfo`].

use std::sync::Arc;

use super::attributes::matching_attributes;
use super::context::CompilationContext;
use super::parameter::SourceParameterInfo;
use crate::base::SymbolId;
use crate::reflect::{
    AttributeInfo, MethodInfo, ParameterInfo, ReflectError, ReflectResult, TypeInfo,
};

/// A view over one method symbol.
pub struct SourceMethodInfo {
    context: Arc<CompilationContext>,
    symbol: SymbolId,
}

impl SourceMethodInfo {
    pub fn new(context: Arc<CompilationContext>, symbol: SymbolId) -> Self {
        Self { context, symbol }
    }

    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }
}

impl MethodInfo for SourceMethodInfo {
    fn is_abstract(&self) -> ReflectResult<bool> {
        Err(ReflectError::unsupported("MethodInfo::is_abstract"))
    }

    fn is_generic_method_definition(&self) -> bool {
        self.context
            .symbol(self.symbol)
            .is_some_and(|s| s.is_generic_method)
    }

    fn is_public(&self) -> ReflectResult<bool> {
        Err(ReflectError::unsupported("MethodInfo::is_public"))
    }

    fn is_static(&self) -> ReflectResult<bool> {
        Err(ReflectError::unsupported("MethodInfo::is_static"))
    }

    fn name(&self) -> &str {
        self.context
            .symbol(self.symbol)
            .map(|s| s.metadata_name.as_str())
            .unwrap_or_default()
    }

    fn return_type(&self) -> ReflectResult<Arc<dyn TypeInfo>> {
        Err(ReflectError::unsupported("MethodInfo::return_type"))
    }

    fn declaring_type(&self) -> ReflectResult<Arc<dyn TypeInfo>> {
        Err(ReflectError::unsupported("MethodInfo::declaring_type"))
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
        Err(ReflectError::unsupported("MethodInfo::generic_arguments"))
    }

    fn parameters(&self) -> Vec<Arc<dyn ParameterInfo>> {
        let Some(symbol) = self.context.symbol(self.symbol) else {
            return Vec::new();
        };
        symbol
            .parameters
            .iter()
            .map(|&parameter| {
                Arc::new(SourceParameterInfo::new(Arc::clone(&self.context), parameter))
                    as Arc<dyn ParameterInfo>
            })
            .collect()
    }

    fn make_generic_method(
        &self,
        _type_arguments: &[Arc<dyn TypeInfo>],
    ) -> ReflectResult<Arc<dyn MethodInfo>> {
        Err(ReflectError::unsupported("MethodInfo::make_generic_method"))
    }
}

impl std::fmt::Debug for SourceMethodInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceMethodInfo")
            .field("symbol", &self.symbol)
            .field("name", &self.name())
            .finish()
    }
}
