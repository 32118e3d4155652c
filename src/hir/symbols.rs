//! Symbol records: the static facts the compiler hands us.
//!
//! These are plain data. A [`Compilation`](super::Compilation) owns them and
//! answers queries by [`SymbolId`]; nothing here knows about reflection.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::SymbolId;

// ============================================================================
// SYMBOL KINDS & FLAGS
// ============================================================================

/// The kind of a declared program element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Assembly,
    Namespace,
    NamedType,
    Method,
    Parameter,
}

impl SymbolKind {
    /// Namespaces and types can both contain nested declarations.
    pub fn is_namespace_or_type(&self) -> bool {
        matches!(self, SymbolKind::Namespace | SymbolKind::NamedType)
    }

    /// Get a display name for this kind.
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Assembly => "assembly",
            SymbolKind::Namespace => "namespace",
            SymbolKind::NamedType => "type",
            SymbolKind::Method => "method",
            SymbolKind::Parameter => "parameter",
        }
    }
}

/// The shape of a named type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

/// Declared accessibility of a symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Accessibility {
    #[default]
    NotApplicable,
    Private,
    ProtectedAndInternal,
    Protected,
    Internal,
    ProtectedOrInternal,
    Public,
}

/// Source sub-language a symbol was declared in.
///
/// One compilation may mix several languages; conversion rules are chosen
/// per symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    CSharp,
    VisualBasic,
    Other(SmolStr),
}

impl Language {
    /// Parse a language name as the compiler spells it.
    pub fn from_name(name: &str) -> Self {
        match name {
            "C#" => Language::CSharp,
            "Visual Basic" => Language::VisualBasic,
            other => Language::Other(SmolStr::new(other)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Language::CSharp => "C#",
            Language::VisualBasic => "Visual Basic",
            Language::Other(name) => name,
        }
    }
}

// ============================================================================
// ATTRIBUTE DATA
// ============================================================================

/// A compile-time constant as it appears in an attribute argument.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedConstant {
    /// A primitive value (`null`, numbers, strings, ...).
    Primitive(ConstantValue),
    /// An enum member, stored as its underlying value.
    Enum { enum_type: SymbolId, value: i64 },
    /// A `typeof(...)` argument; `None` when the operand did not bind.
    Type(Option<SymbolId>),
    /// An array argument; elements may themselves be arrays.
    Array(Vec<TypedConstant>),
}

impl TypedConstant {
    pub fn is_array(&self) -> bool {
        matches!(self, TypedConstant::Array(_))
    }

    /// The primitive value, if this constant is one.
    pub fn primitive(&self) -> Option<&ConstantValue> {
        match self {
            TypedConstant::Primitive(value) => Some(value),
            _ => None,
        }
    }
}

impl From<ConstantValue> for TypedConstant {
    fn from(value: ConstantValue) -> Self {
        TypedConstant::Primitive(value)
    }
}

/// Primitive constant values.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(Arc<str>),
}

impl From<bool> for ConstantValue {
    fn from(value: bool) -> Self {
        ConstantValue::Bool(value)
    }
}

impl From<i64> for ConstantValue {
    fn from(value: i64) -> Self {
        ConstantValue::Int(value)
    }
}

impl From<&str> for ConstantValue {
    fn from(value: &str) -> Self {
        ConstantValue::String(Arc::from(value))
    }
}

/// One attribute application on a symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeData {
    /// The attribute's type. `None` when the attribute name did not bind
    /// (common while the user is still typing).
    pub attribute_class: Option<SymbolId>,
    /// Positional constructor arguments, in source order.
    pub constructor_arguments: Vec<TypedConstant>,
    /// Named arguments (`Name = value`), in source order.
    pub named_arguments: Vec<(SmolStr, TypedConstant)>,
}

impl AttributeData {
    /// Create an attribute application with no arguments.
    pub fn new(attribute_class: SymbolId) -> Self {
        Self {
            attribute_class: Some(attribute_class),
            constructor_arguments: Vec::new(),
            named_arguments: Vec::new(),
        }
    }

    /// Add a constructor argument.
    pub fn with_argument(mut self, argument: impl Into<TypedConstant>) -> Self {
        self.constructor_arguments.push(argument.into());
        self
    }

    /// Add a named argument.
    pub fn with_named(mut self, name: &str, argument: impl Into<TypedConstant>) -> Self {
        self.named_arguments.push((SmolStr::new(name), argument.into()));
        self
    }

    /// Look up a named argument by exact name.
    pub fn named_argument(&self, name: &str) -> Option<&TypedConstant> {
        self.named_arguments
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

// ============================================================================
// SYMBOL
// ============================================================================

/// A declared program element.
///
/// Fields that do not apply to a kind stay at their defaults (e.g. a
/// namespace has no base type, a type has no parameters).
#[derive(Clone, Debug)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// The simple name as written in source (`Inner`, `M`).
    pub name: SmolStr,
    /// The metadata name (`List`1`, `M`); equal to `name` for most symbols.
    pub metadata_name: SmolStr,
    pub language: Language,
    pub accessibility: Accessibility,
    /// Shape of a named type; `Class` for non-types.
    pub type_kind: TypeKind,
    /// The namespace, type or method this symbol is declared in.
    pub containing: Option<SymbolId>,
    pub is_abstract: bool,
    pub is_sealed: bool,
    /// True for a method with its own type parameters.
    pub is_generic_method: bool,
    /// Base class of a type. `None` for the root object type, interfaces,
    /// and non-types.
    pub base_type: Option<SymbolId>,
    /// Interfaces a type declares it implements.
    pub interfaces: Vec<SymbolId>,
    /// The method this method overrides, one level up.
    pub overridden_method: Option<SymbolId>,
    /// Members of a namespace or type, in declaration order.
    pub members: Vec<SymbolId>,
    /// Parameters of a method, in declaration order.
    pub parameters: Vec<SymbolId>,
    /// Declared type of a parameter.
    pub parameter_type: Option<SymbolId>,
    /// Attributes applied directly to this symbol, in source order.
    pub attributes: Vec<AttributeData>,
}

impl Symbol {
    /// Create a symbol of `kind` with everything else defaulted.
    pub fn new(kind: SymbolKind, name: &str, language: Language) -> Self {
        Self {
            kind,
            name: SmolStr::new(name),
            metadata_name: SmolStr::new(name),
            language,
            accessibility: Accessibility::NotApplicable,
            type_kind: TypeKind::Class,
            containing: None,
            is_abstract: false,
            is_sealed: false,
            is_generic_method: false,
            base_type: None,
            interfaces: Vec::new(),
            overridden_method: None,
            members: Vec::new(),
            parameters: Vec::new(),
            parameter_type: None,
            attributes: Vec::new(),
        }
    }

    pub fn is_type(&self) -> bool {
        self.kind == SymbolKind::NamedType
    }

    pub fn is_public(&self) -> bool {
        self.accessibility == Accessibility::Public
    }
}
