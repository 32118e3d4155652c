//! Attribute resolution: inheritance-aware attribute sets and matching.
//!
//! Reflection reports more than the attributes written on a symbol: a type
//! also carries inheritable attributes of its base classes, and an
//! overriding method those of the method it overrides. This module computes
//! that effective set from symbols alone.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::attribute::SourceAttributeInfo;
use super::context::CompilationContext;
use crate::base::SymbolId;
use crate::hir::{
    ATTRIBUTE_USAGE_METADATA_NAME, AttributeData, Compilation, ConstantValue, Hierarchy,
    SymbolKind, TypedConstant,
};
use crate::reflect::AttributeInfo;

// ============================================================================
// ATTRIBUTE TYPE NAMES
// ============================================================================

/// A parsed `TypeName[, AssemblyName[, ...]]` attribute type reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeTypeName<'a> {
    /// Fully-qualified metadata name of the type.
    pub type_name: &'a str,
    /// Simple assembly name, when one was given. Not used for matching.
    pub assembly_name: Option<&'a str>,
}

impl<'a> AttributeTypeName<'a> {
    /// Parse an (optionally assembly-qualified) type name.
    ///
    /// Returns `None` for names that cannot be resolved unambiguously: an
    /// empty type name, or generic-argument brackets whose nested commas
    /// make the type/assembly split ambiguous.
    pub fn parse(name: &'a str) -> Option<Self> {
        let (type_part, rest) = match name.split_once(',') {
            Some((type_part, rest)) => (type_part, Some(rest)),
            None => (name, None),
        };
        let type_name = type_part.trim();
        if type_name.is_empty() || type_name.contains(['[', ']']) {
            return None;
        }
        let assembly_name = rest
            .and_then(|rest| rest.split(',').next())
            .map(str::trim)
            .filter(|assembly| !assembly.is_empty());
        Some(Self {
            type_name,
            assembly_name,
        })
    }
}

// ============================================================================
// EFFECTIVE ATTRIBUTES
// ============================================================================

/// One attribute application, addressed by the symbol it is written on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedAttribute<'a> {
    /// The symbol the attribute is written on (may be a base type or an
    /// overridden method for inherited attributes).
    pub owner: SymbolId,
    /// Position in the owner's attribute list.
    pub index: usize,
    pub data: &'a AttributeData,
}

/// The attributes reflection reports for a symbol.
#[derive(Clone, Debug)]
pub enum EffectiveAttributes<'a> {
    /// Nothing was inherited; the symbol's own list, unchanged.
    Direct {
        owner: SymbolId,
        attributes: &'a [AttributeData],
    },
    /// Own attributes followed by inherited ones.
    WithInherited(Vec<AppliedAttribute<'a>>),
}

impl<'a> EffectiveAttributes<'a> {
    fn empty(owner: SymbolId) -> Self {
        EffectiveAttributes::Direct {
            owner,
            attributes: &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = AppliedAttribute<'a>> + '_ {
        let direct = match self {
            EffectiveAttributes::Direct { owner, attributes } => {
                let owner = *owner;
                let applied = attributes.iter().enumerate();
                Some(applied.map(move |(index, data)| {
                    AppliedAttribute { owner, index, data }
                }))
            }
            EffectiveAttributes::WithInherited(_) => None,
        };
        let inherited = match self {
            EffectiveAttributes::WithInherited(applied) => Some(applied.iter().copied()),
            EffectiveAttributes::Direct { .. } => None,
        };
        direct
            .into_iter()
            .flatten()
            .chain(inherited.into_iter().flatten())
    }

    pub fn len(&self) -> usize {
        match self {
            EffectiveAttributes::Direct { attributes, .. } => attributes.len(),
            EffectiveAttributes::WithInherited(applied) => applied.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if at least one inherited attribute was added.
    pub fn has_inherited(&self) -> bool {
        matches!(self, EffectiveAttributes::WithInherited(_))
    }
}

/// Compute the attributes reflection would report for `symbol`.
///
/// Starts from the symbol's own attributes (duplicates preserved), then
/// appends inheritable attributes from each base type (nearest first, root
/// object type excluded) or from the immediately overridden method. An
/// inherited attribute is dropped when its attribute type is already
/// present from a more-derived level.
///
/// Reads the compilation directly; the context's lookup cache is left
/// untouched.
pub fn attributes_including_inherited<'a>(
    compilation: &'a dyn Compilation,
    symbol: SymbolId,
) -> EffectiveAttributes<'a> {
    let Some(subject) = compilation.symbol(symbol) else {
        return EffectiveAttributes::empty(symbol);
    };

    let levels: Vec<SymbolId> = match subject.kind {
        SymbolKind::NamedType => Hierarchy::above(compilation, symbol).collect(),
        SymbolKind::Method => subject.overridden_method.into_iter().collect(),
        _ => Vec::new(),
    };

    let usage_lookup = || compilation.type_by_metadata_name(ATTRIBUTE_USAGE_METADATA_NAME);
    let mut usage_type = None;
    let mut applied_classes: Option<FxHashSet<SymbolId>> = None;
    let mut effective: Option<Vec<AppliedAttribute<'a>>> = None;

    for level in levels {
        let Some(base) = compilation.symbol(level) else {
            continue;
        };
        let usage = *usage_type.get_or_insert_with(usage_lookup);

        for (index, data) in base.attributes.iter().enumerate() {
            let Some(class) = data.attribute_class else {
                continue;
            };
            if !is_inherited(compilation, class, usage) {
                continue;
            }

            let applied_classes = applied_classes.get_or_insert_with(|| {
                subject
                    .attributes
                    .iter()
                    .filter_map(|a| a.attribute_class)
                    .collect()
            });
            if applied_classes.insert(class) {
                let effective = effective.get_or_insert_with(|| {
                    subject
                        .attributes
                        .iter()
                        .enumerate()
                        .map(|(index, data)| AppliedAttribute {
                            owner: symbol,
                            index,
                            data,
                        })
                        .collect()
                });
                effective.push(AppliedAttribute {
                    owner: level,
                    index,
                    data,
                });
            }
        }
    }

    match effective {
        Some(applied) => EffectiveAttributes::WithInherited(applied),
        None => EffectiveAttributes::Direct {
            owner: symbol,
            attributes: &subject.attributes,
        },
    }
}

/// Whether applications of `attribute_class` flow to derived symbols.
///
/// Decided by the nearest `AttributeUsage` in the attribute class's own
/// hierarchy: its `Inherited` named argument, or `true` when absent.
fn is_inherited(
    compilation: &dyn Compilation,
    attribute_class: SymbolId,
    usage_type: Option<SymbolId>,
) -> bool {
    let Some(usage_type) = usage_type else {
        return true;
    };
    for class in Hierarchy::from(compilation, attribute_class) {
        let Some(symbol) = compilation.symbol(class) else {
            break;
        };
        let usage = symbol
            .attributes
            .iter()
            .find(|a| a.attribute_class == Some(usage_type));
        if let Some(usage) = usage {
            return match usage.named_argument("Inherited") {
                Some(TypedConstant::Primitive(ConstantValue::Bool(inherited))) => *inherited,
                _ => true,
            };
        }
    }
    true
}

// ============================================================================
// MATCHING
// ============================================================================

/// Attributes of `symbol` (inherited included) whose type is assignable to
/// the named attribute type.
///
/// An unparseable or unresolvable name matches nothing.
pub fn matching_attributes(
    context: &Arc<CompilationContext>,
    symbol: SymbolId,
    assembly_qualified_attribute_type_name: &str,
) -> Vec<Arc<dyn AttributeInfo>> {
    let attributes = attributes_including_inherited(context.compilation(), symbol);
    if attributes.is_empty() {
        return Vec::new();
    }
    let Some(name) = AttributeTypeName::parse(assembly_qualified_attribute_type_name) else {
        return Vec::new();
    };
    let Some(target) = context.type_by_metadata_name(name.type_name) else {
        return Vec::new();
    };

    attributes
        .iter()
        .filter(|applied| {
            applied
                .data
                .attribute_class
                .is_some_and(|class| context.is_assignable_to(class, target))
        })
        .map(|applied| {
            Arc::new(SourceAttributeInfo::new(
                Arc::clone(context),
                applied.owner,
                applied.index,
            )) as Arc<dyn AttributeInfo>
        })
        .collect()
}
