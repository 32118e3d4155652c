//! End-to-end discovery over the in-memory workspace.
//!
//! Builds small xUnit-shaped projects with `SymbolGraphBuilder`, runs the
//! reference `FactEngine` through `SourceTestDiscoverer`, and checks what
//! reaches the host callback.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use source_discovery::hir::{
    AttributeData, ConstantValue, Language, SymbolGraphBuilder, SyntaxKind, SyntaxTree,
};
use source_discovery::{
    DiscovererOptions, DiscoveryContext, DiscoveryOutcome, DocumentId, FactEngine, InMemoryProject,
    ProjectId, SourceTestDiscoverer, SymbolId, TestCase, Trait,
};
use tokio_util::sync::CancellationToken;

const SOURCE: &str = "/bin/Debug/Tests.dll";

// ============================================================================
// HELPERS
// ============================================================================

struct Framework {
    fact: SymbolId,
    trait_attribute: SymbolId,
}

/// Declares `Xunit.FactAttribute`, `Xunit.TraitAttribute` and the SDK types
/// trait discovery keys on.
fn framework(builder: &mut SymbolGraphBuilder) -> Framework {
    let xunit = builder.namespace_path("Xunit");
    let sdk = builder.namespace_path("Xunit.Sdk");
    let fact = builder.attribute_class(xunit, "FactAttribute", None, None);
    let trait_interface = builder.interface(sdk, "ITraitAttribute");
    let discoverer = builder.attribute_class(sdk, "TraitDiscovererAttribute", None, None);
    let trait_attribute = builder.attribute_class(xunit, "TraitAttribute", None, Some(true));
    builder
        .symbol_mut(trait_attribute)
        .unwrap()
        .interfaces
        .push(trait_interface);
    builder.apply(
        trait_attribute,
        AttributeData::new(discoverer)
            .with_argument(ConstantValue::from("Xunit.Sdk.TraitDiscoverer"))
            .with_argument(ConstantValue::from("xunit.core")),
    );
    Framework {
        fact,
        trait_attribute,
    }
}

/// One document declaring `types` directly under namespace `Tests`.
fn single_document_project(
    builder: SymbolGraphBuilder,
    namespace: SymbolId,
    types: &[SymbolId],
) -> Arc<InMemoryProject> {
    let mut builder = builder;
    let document = DocumentId::new(0);
    let mut tree = SyntaxTree::new(document, "/src/Tests.cs");
    let ns_node = tree
        .add_node(tree.root(), SyntaxKind::NamespaceDeclaration)
        .unwrap();
    builder.declare(document, ns_node, namespace);
    for &ty in types {
        let node = tree.add_node(ns_node, SyntaxKind::TypeDeclaration).unwrap();
        builder.declare(document, node, ty);
    }

    let project = InMemoryProject::new(ProjectId::new(0), "Tests");
    project.set_compilation(Some(Arc::new(builder.finish())));
    project.add_document(tree);
    project
}

fn discover(project: Arc<InMemoryProject>) -> (DiscoveryOutcome, Vec<TestCase>) {
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);
    let context = DiscoveryContext::project(
        project,
        move |test| sink.lock().push(test),
        SOURCE,
        CancellationToken::new(),
    );
    let discoverer = SourceTestDiscoverer::with_options(
        FactEngine::new(),
        DiscovererOptions::default().with_poll_interval(Duration::from_millis(5)),
    );
    let outcome = discoverer.analyze_project(&context).unwrap();
    let tests = reported.lock().clone();
    (outcome, tests)
}

fn names(tests: &[TestCase]) -> Vec<&str> {
    tests
        .iter()
        .map(|t| t.fully_qualified_name.as_str())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_override_inherits_fact_and_is_reported_once() {
    let mut builder = SymbolGraphBuilder::new("Tests");
    let xunit = framework(&mut builder);
    let ns = builder.namespace_path("Tests");
    let base = builder.class(ns, "BaseTests");
    let base_check = builder.method(base, "Check");
    builder.apply(base_check, AttributeData::new(xunit.fact));
    let derived = builder.derived_class(ns, "DerivedTests", base);
    builder.override_method(derived, "Check", base_check);

    let project = single_document_project(builder, ns, &[base, derived]);
    let (outcome, tests) = discover(project);

    assert_eq!(outcome, DiscoveryOutcome::Completed);
    assert_eq!(
        names(&tests),
        vec!["Tests.BaseTests.Check", "Tests.DerivedTests.Check"]
    );
}

#[test]
fn test_class_traits_inherited_from_base() {
    let mut builder = SymbolGraphBuilder::new("Tests");
    let xunit = framework(&mut builder);
    let ns = builder.namespace_path("Tests");
    let base = builder.class(ns, "IntegrationBase");
    builder.symbol_mut(base).unwrap().is_abstract = true;
    builder.apply(
        base,
        AttributeData::new(xunit.trait_attribute)
            .with_argument(ConstantValue::from("Category"))
            .with_argument(ConstantValue::from("Integration")),
    );
    let derived = builder.derived_class(ns, "DatabaseTests", base);
    let connects = builder.method(derived, "Connects");
    builder.apply(connects, AttributeData::new(xunit.fact));
    builder.apply(
        connects,
        AttributeData::new(xunit.trait_attribute)
            .with_argument(ConstantValue::from("Category"))
            .with_argument(ConstantValue::from("Slow")),
    );

    let project = single_document_project(builder, ns, &[base, derived]);
    let (_, tests) = discover(project);

    assert_eq!(names(&tests), vec!["Tests.DatabaseTests.Connects"]);
    assert_eq!(
        tests[0].traits,
        vec![
            Trait::new("Category", "Integration"),
            Trait::new("Category", "Slow"),
        ]
    );
}

#[test]
fn test_non_inherited_fact_stays_on_base() {
    let mut builder = SymbolGraphBuilder::new("Tests");
    let xunit = framework(&mut builder);
    let ns = builder.namespace_path("Tests");
    let local_fact = builder.attribute_class(
        ns,
        "LocalFactAttribute",
        Some(xunit.fact),
        Some(false),
    );
    let base = builder.class(ns, "BaseTests");
    let check = builder.method(base, "Check");
    builder.apply(check, AttributeData::new(local_fact));
    let derived = builder.derived_class(ns, "DerivedTests", base);
    builder.override_method(derived, "Check", check);

    let project = single_document_project(builder, ns, &[base, derived]);
    let (outcome, tests) = discover(project);

    assert_eq!(outcome, DiscoveryOutcome::Completed);
    assert_eq!(names(&tests), vec!["Tests.BaseTests.Check"]);
}

#[test]
fn test_visual_basic_project() {
    let mut builder = SymbolGraphBuilder::new("VbTests");
    builder.set_language(Language::VisualBasic);
    let xunit = framework(&mut builder);
    let ns = builder.namespace_path("VbTests");
    let class = builder.class(ns, "Arithmetic");
    let adds = builder.method(class, "Adds");
    builder.apply(
        adds,
        AttributeData::new(xunit.fact).with_named("DisplayName", ConstantValue::from("Adds (VB)")),
    );

    let project = single_document_project(builder, ns, &[class]);
    let (_, tests) = discover(project);

    assert_eq!(names(&tests), vec!["VbTests.Arithmetic.Adds"]);
    assert_eq!(tests[0].display_name, "Adds (VB)");
}

#[test]
fn test_unknown_language_matches_nothing() {
    let mut builder = SymbolGraphBuilder::new("FsTests");
    builder.set_language(Language::from_name("F#"));
    let xunit = framework(&mut builder);
    let ns = builder.namespace_path("FsTests");
    let class = builder.class(ns, "Arithmetic");
    let adds = builder.method(class, "Adds");
    builder.apply(adds, AttributeData::new(xunit.fact));

    let project = single_document_project(builder, ns, &[class]);
    let (outcome, tests) = discover(project);

    assert_eq!(outcome, DiscoveryOutcome::Completed);
    assert!(tests.is_empty());
}

#[test]
fn test_project_without_compilation() {
    let project = InMemoryProject::new(ProjectId::new(0), "Unloaded");
    project.add_document(SyntaxTree::new(DocumentId::new(0), "/src/Tests.cs"));
    let (outcome, tests) = discover(project);

    assert_eq!(outcome, DiscoveryOutcome::Completed);
    assert!(tests.is_empty());
}

#[test]
fn test_concurrent_passes_share_project() {
    let mut builder = SymbolGraphBuilder::new("Tests");
    let xunit = framework(&mut builder);
    let ns = builder.namespace_path("Tests");
    let class = builder.class(ns, "SharedTests");
    for name in ["One", "Two", "Three"] {
        let method = builder.method(class, name);
        builder.apply(method, AttributeData::new(xunit.fact));
    }
    let project = single_document_project(builder, ns, &[class]);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let project = Arc::clone(&project);
                scope.spawn(move || discover(project))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (outcome, tests) in results {
        assert_eq!(outcome, DiscoveryOutcome::Completed);
        assert_eq!(
            names(&tests),
            vec![
                "Tests.SharedTests.One",
                "Tests.SharedTests.Two",
                "Tests.SharedTests.Three",
            ]
        );
    }
}
