//! Reflection surface: what a discovery engine sees of "the assembly".
//!
//! These traits mirror the runtime reflection queries a test framework
//! makes while discovering tests: enumerate types, enumerate methods, read
//! attributes and their arguments. A discovery engine is written against
//! them and never learns whether the answers came from a loaded binary or
//! from source.
//!
//! Members that have no source-based implementation return
//! [`ReflectError::Unsupported`]; they never approximate.

use std::sync::Arc;

use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Failure of a reflective query.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReflectError {
    /// The queried member has no source-based implementation.
    #[error("`{member}` is not supported by source-based reflection")]
    Unsupported { member: &'static str },
}

impl ReflectError {
    pub(crate) fn unsupported(member: &'static str) -> Self {
        tracing::debug!(member, "unsupported reflective query");
        ReflectError::Unsupported { member }
    }
}

pub type ReflectResult<T> = Result<T, ReflectError>;

// ============================================================================
// ARGUMENT VALUES
// ============================================================================

/// An attribute argument value as a discovery engine sees it.
///
/// Array arguments are nested sequences, recursively.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentValue {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(Arc<str>),
    /// A `typeof(...)` argument, rendered as a qualified type name;
    /// `None` if the operand did not bind.
    Type(Option<Arc<str>>),
    /// An enum member's underlying value.
    Enum(i64),
    Array(Vec<ArgumentValue>),
}

impl ArgumentValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgumentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgumentValue::Int(i) | ArgumentValue::Enum(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ArgumentValue]> {
        match self {
            ArgumentValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ArgumentValue::Null)
    }
}

// ============================================================================
// REFLECTION TRAITS
// ============================================================================

/// The assembly being inspected.
pub trait AssemblyInfo: Send + Sync {
    /// On-disk location; `None` when the assembly has not been built.
    fn assembly_path(&self) -> Option<&str>;

    /// Assembly name; `None` if it cannot be determined.
    fn name(&self) -> Option<String>;

    /// Assembly-level attributes assignable to the named attribute type.
    fn custom_attributes(
        &self,
        assembly_qualified_attribute_type_name: &str,
    ) -> Vec<Arc<dyn AttributeInfo>>;

    /// Look up one type by name.
    fn get_type(&self, type_name: &str) -> ReflectResult<Option<Arc<dyn TypeInfo>>>;

    /// All types, or only publicly visible ones.
    fn types(&self, include_private_types: bool) -> Vec<Arc<dyn TypeInfo>>;
}

/// A type.
pub trait TypeInfo: Send + Sync {
    fn assembly(&self) -> Option<Arc<dyn AssemblyInfo>>;

    fn base_type(&self) -> ReflectResult<Option<Arc<dyn TypeInfo>>>;

    fn interfaces(&self) -> ReflectResult<Vec<Arc<dyn TypeInfo>>>;

    fn is_abstract(&self) -> bool;

    fn is_generic_parameter(&self) -> ReflectResult<bool>;

    fn is_generic_type(&self) -> ReflectResult<bool>;

    fn is_sealed(&self) -> bool;

    fn is_value_type(&self) -> ReflectResult<bool>;

    /// Fully-qualified name, using `+` between a nested type and its
    /// container (`N.Outer+Inner`).
    fn name(&self) -> &str;

    /// Attributes (including inherited ones) assignable to the named type.
    fn custom_attributes(
        &self,
        assembly_qualified_attribute_type_name: &str,
    ) -> Vec<Arc<dyn AttributeInfo>>;

    fn generic_arguments(&self) -> ReflectResult<Vec<Arc<dyn TypeInfo>>>;

    fn method(
        &self,
        method_name: &str,
        include_private_method: bool,
    ) -> ReflectResult<Option<Arc<dyn MethodInfo>>>;

    /// Methods declared on this type and its bases (excluding the root
    /// object type), each override reported once at its most-derived
    /// declaration.
    fn methods(&self, include_private_methods: bool) -> Vec<Arc<dyn MethodInfo>>;
}

/// A method.
pub trait MethodInfo: Send + Sync {
    fn is_abstract(&self) -> ReflectResult<bool>;

    fn is_generic_method_definition(&self) -> bool;

    fn is_public(&self) -> ReflectResult<bool>;

    fn is_static(&self) -> ReflectResult<bool>;

    /// Metadata name.
    fn name(&self) -> &str;

    fn return_type(&self) -> ReflectResult<Arc<dyn TypeInfo>>;

    fn declaring_type(&self) -> ReflectResult<Arc<dyn TypeInfo>>;

    fn custom_attributes(
        &self,
        assembly_qualified_attribute_type_name: &str,
    ) -> Vec<Arc<dyn AttributeInfo>>;

    fn generic_arguments(&self) -> ReflectResult<Vec<Arc<dyn TypeInfo>>>;

    /// Parameters in declaration order.
    fn parameters(&self) -> Vec<Arc<dyn ParameterInfo>>;

    fn make_generic_method(
        &self,
        type_arguments: &[Arc<dyn TypeInfo>],
    ) -> ReflectResult<Arc<dyn MethodInfo>>;
}

/// A method parameter.
pub trait ParameterInfo: Send + Sync {
    fn name(&self) -> &str;

    fn parameter_type(&self) -> ReflectResult<Arc<dyn TypeInfo>>;
}

/// One attribute application.
pub trait AttributeInfo: Send + Sync {
    /// Positional constructor arguments; arrays become nested sequences.
    fn constructor_arguments(&self) -> Vec<ArgumentValue>;

    /// Attributes applied to this attribute's own type.
    fn custom_attributes(
        &self,
        assembly_qualified_attribute_type_name: &str,
    ) -> Vec<Arc<dyn AttributeInfo>>;

    /// A named argument's value; `None` if it was not supplied.
    fn named_argument(&self, argument_name: &str) -> Option<ArgumentValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_accessors() {
        let value = ArgumentValue::Array(vec![
            ArgumentValue::Int(1),
            ArgumentValue::String(Arc::from("two")),
        ]);
        let items = value.as_array().unwrap();
        assert_eq!(items[0].as_int(), Some(1));
        assert_eq!(items[1].as_str(), Some("two"));
        assert_eq!(items[1].as_bool(), None);
        assert!(ArgumentValue::Null.is_null());
    }

    #[test]
    fn test_unsupported_message() {
        let err = ReflectError::unsupported("TypeInfo::base_type");
        assert_eq!(
            err.to_string(),
            "`TypeInfo::base_type` is not supported by source-based reflection"
        );
    }
}
