//! Source-based [`ParameterInfo`].

use std::sync::Arc;

use super::context::CompilationContext;
use super::type_info::SourceTypeInfo;
use crate::base::SymbolId;
use crate::reflect::{ParameterInfo, ReflectError, ReflectResult, TypeInfo};

/// A view over one parameter symbol.
pub struct SourceParameterInfo {
    context: Arc<CompilationContext>,
    symbol: SymbolId,
}

impl SourceParameterInfo {
    pub fn new(context: Arc<CompilationContext>, symbol: SymbolId) -> Self {
        Self { context, symbol }
    }
}

impl ParameterInfo for SourceParameterInfo {
    fn name(&self) -> &str {
        self.context
            .symbol(self.symbol)
            .map(|s| s.name.as_str())
            .unwrap_or_default()
    }

    /// Only named types are supported; arrays, pointers, type parameters
    /// and unbound types are not.
    fn parameter_type(&self) -> ReflectResult<Arc<dyn TypeInfo>> {
        let declared = self
            .context
            .symbol(self.symbol)
            .and_then(|s| s.parameter_type)
            .filter(|&ty| self.context.symbol(ty).is_some_and(|s| s.is_type()));
        match declared {
            Some(ty) => Ok(Arc::new(SourceTypeInfo::new(Arc::clone(&self.context), ty))),
            None => Err(ReflectError::unsupported("ParameterInfo::parameter_type")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::SymbolGraphBuilder;
    use crate::source::context::tests::detached;

    #[test]
    fn test_unbound_parameter_type() {
        let mut builder = SymbolGraphBuilder::new("Tests");
        let ns = builder.namespace_path("N");
        let class = builder.class(ns, "A");
        let method = builder.method(class, "M");
        let parameter = builder.parameter(method, "value", None);
        let context = detached(Arc::new(builder.finish()));

        let info = SourceParameterInfo::new(context, parameter);
        assert_eq!(info.name(), "value");
        assert!(info.parameter_type().is_err());
    }

    #[test]
    fn test_nested_parameter_type_name() {
        let mut builder = SymbolGraphBuilder::new("Tests");
        let ns = builder.namespace_path("N");
        let class = builder.class(ns, "A");
        let options = builder.class(class, "Options");
        let method = builder.method(class, "M");
        let parameter = builder.parameter(method, "options", Some(options));
        let context = detached(Arc::new(builder.finish()));

        let info = SourceParameterInfo::new(context, parameter);
        assert_eq!(info.parameter_type().unwrap().name(), "N.A+Options");
    }
}
