//! Source-backed reflection adapters.
//!
//! Every adapter handed to a discovery engine is a thin view over a
//! [`SymbolId`](crate::base::SymbolId) plus a shared [`CompilationContext`].
//! Nothing is copied out of the compilation; names and type lists are
//! memoized on first use.
//!
//! ```text
//! SourceAssemblyInfo ── owns ──→ CompilationContext (lazy, once)
//!        │                               ↑
//!        └─ types() → SourceTypeInfo ────┤
//!                        └─ methods() → SourceMethodInfo
//!                                          └─ parameters() → SourceParameterInfo
//! custom_attributes() (any of the above) → SourceAttributeInfo
//! ```

mod assembly;
mod attribute;
mod attributes;
mod context;
mod method;
mod parameter;
mod type_info;

pub use assembly::SourceAssemblyInfo;
pub use attribute::SourceAttributeInfo;
pub use attributes::{
    AppliedAttribute, AttributeTypeName, EffectiveAttributes, attributes_including_inherited,
    matching_attributes,
};
pub use context::CompilationContext;
pub use method::SourceMethodInfo;
pub use parameter::SourceParameterInfo;
pub use type_info::{SourceTypeInfo, qualified_type_name, render_metadata_name};
