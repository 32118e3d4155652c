//! Property tests for attribute type-name parsing and metadata-name
//! rendering.
#![cfg(feature = "proptest")]

use proptest::prelude::*;
use source_discovery::hir::{DisplayPart, DisplayPartKind, SymbolGraphBuilder};
use source_discovery::source::{AttributeTypeName, qualified_type_name, render_metadata_name};

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

fn arb_identifier() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9_]{0,12}"
}

fn arb_namespace() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_identifier(), 0..4)
}

fn arb_type_chain() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_identifier(), 1..4)
}

fn expected_name(namespace: &[String], types: &[String]) -> String {
    let mut name = namespace.join(".");
    if !name.is_empty() {
        name.push('.');
    }
    name.push_str(&types.join("+"));
    name
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_parse_splits_type_and_assembly(
        namespace in arb_namespace(),
        ty in arb_identifier(),
        assembly in arb_identifier(),
        padding in " {0,3}",
    ) {
        let type_name = expected_name(&namespace, &[ty]);
        let qualified = format!("{type_name},{padding}{assembly}, Version=1.0.0.0");
        let parsed = AttributeTypeName::parse(&qualified).unwrap();

        prop_assert_eq!(parsed.type_name, type_name.as_str());
        prop_assert_eq!(parsed.assembly_name, Some(assembly.as_str()));
    }

    #[test]
    fn prop_bracketed_names_are_unresolvable(
        ty in arb_identifier(),
        argument in arb_identifier(),
    ) {
        let generic = format!("{ty}`1[[{argument}, mscorlib]], xunit.core");
        prop_assert!(AttributeTypeName::parse(&generic).is_none());
    }

    #[test]
    fn prop_render_uses_plus_only_between_types(
        namespace in arb_namespace(),
        types in arb_type_chain(),
    ) {
        let mut parts = Vec::new();
        for segment in &namespace {
            parts.push(DisplayPart::new(DisplayPartKind::NamespaceName, segment.as_str()));
            parts.push(DisplayPart::new(DisplayPartKind::Punctuation, "."));
        }
        for (i, segment) in types.iter().enumerate() {
            if i > 0 {
                parts.push(DisplayPart::new(DisplayPartKind::Punctuation, "."));
            }
            parts.push(DisplayPart::new(DisplayPartKind::TypeName, segment.as_str()));
        }

        prop_assert_eq!(render_metadata_name(&parts), expected_name(&namespace, &types));
    }

    #[test]
    fn prop_qualified_name_matches_metadata_lookup(
        namespace in arb_namespace(),
        types in arb_type_chain(),
    ) {
        let mut builder = SymbolGraphBuilder::new("Props");
        let mut containing = builder.namespace_path(&namespace.join("."));
        for segment in &types {
            containing = builder.class(containing, segment);
        }
        let innermost = containing;
        let graph = builder.finish();

        let name = qualified_type_name(&graph, innermost);
        prop_assert_eq!(&name, &expected_name(&namespace, &types));
        prop_assert_eq!(
            source_discovery::Compilation::type_by_metadata_name(&graph, &name),
            Some(innermost)
        );
    }
}
