//! Source-based [`AttributeInfo`].

use std::sync::Arc;

use super::attributes::matching_attributes;
use super::context::CompilationContext;
use super::type_info::qualified_type_name;
use crate::base::SymbolId;
use crate::hir::{AttributeData, ConstantValue, TypedConstant};
use crate::reflect::{ArgumentValue, AttributeInfo};

/// A view over one attribute application.
///
/// Holds the owning symbol and the attribute's position rather than a copy
/// of its data.
pub struct SourceAttributeInfo {
    context: Arc<CompilationContext>,
    owner: SymbolId,
    index: usize,
}

impl SourceAttributeInfo {
    pub fn new(context: Arc<CompilationContext>, owner: SymbolId, index: usize) -> Self {
        Self {
            context,
            owner,
            index,
        }
    }

    /// The symbol the attribute is written on.
    pub fn owner(&self) -> SymbolId {
        self.owner
    }

    /// The attribute's type.
    pub fn attribute_class(&self) -> Option<SymbolId> {
        self.data().and_then(|data| data.attribute_class)
    }

    fn data(&self) -> Option<&AttributeData> {
        self.context.symbol(self.owner)?.attributes.get(self.index)
    }

    fn value(&self, constant: &TypedConstant) -> ArgumentValue {
        match constant {
            TypedConstant::Primitive(value) => match value {
                ConstantValue::Null => ArgumentValue::Null,
                ConstantValue::Bool(b) => ArgumentValue::Bool(*b),
                ConstantValue::Char(c) => ArgumentValue::Char(*c),
                ConstantValue::Int(i) => ArgumentValue::Int(*i),
                ConstantValue::UInt(u) => ArgumentValue::UInt(*u),
                ConstantValue::Float(f) => ArgumentValue::Float(*f),
                ConstantValue::String(s) => ArgumentValue::String(Arc::clone(s)),
            },
            TypedConstant::Enum { value, .. } => ArgumentValue::Enum(*value),
            TypedConstant::Type(ty) => {
                let name = ty.map(|ty| qualified_type_name(self.context.compilation(), ty));
                ArgumentValue::Type(name.map(Arc::from))
            }
            TypedConstant::Array(items) => {
                ArgumentValue::Array(items.iter().map(|item| self.value(item)).collect())
            }
        }
    }
}

impl AttributeInfo for SourceAttributeInfo {
    fn constructor_arguments(&self) -> Vec<ArgumentValue> {
        let Some(data) = self.data() else {
            return Vec::new();
        };
        data.constructor_arguments
            .iter()
            .map(|argument| self.value(argument))
            .collect()
    }

    fn custom_attributes(
        &self,
        assembly_qualified_attribute_type_name: &str,
    ) -> Vec<Arc<dyn AttributeInfo>> {
        match self.attribute_class() {
            Some(class) => matching_attributes(
                &self.context,
                class,
                assembly_qualified_attribute_type_name,
            ),
            None => Vec::new(),
        }
    }

    fn named_argument(&self, argument_name: &str) -> Option<ArgumentValue> {
        let argument = self.data()?.named_argument(argument_name)?;
        Some(self.value(argument))
    }
}

impl std::fmt::Debug for SourceAttributeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceAttributeInfo")
            .field("owner", &self.owner)
            .field("index", &self.index)
            .finish()
    }
}
