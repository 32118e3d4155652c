//! Shared test fixtures: a small xUnit-shaped project in the in-memory
//! backend.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::base::{DocumentId, NodeId, ProjectId, SymbolId};
use crate::engine::{EngineTestCase, TestMethod};
use crate::hir::{
    AttributeData, ConstantValue, SymbolGraphBuilder, SymbolKind, SyntaxKind, SyntaxTree,
};
use crate::reflect::AssemblyInfo;
use crate::source::SourceAssemblyInfo;
use crate::workspace::{AnalysisScope, InMemoryDocument, InMemoryProject};

pub(crate) const TESTS_PATH: &str = "/src/CalculatorTests.cs";
pub(crate) const OTHER_PATH: &str = "/src/OtherTests.cs";

pub(crate) struct XunitFixture {
    pub(crate) project: Arc<InMemoryProject>,
    pub(crate) tests_document: Arc<InMemoryDocument>,
    pub(crate) other_document: Arc<InMemoryDocument>,
}

impl XunitFixture {
    pub(crate) fn document_assembly(&self) -> Arc<SourceAssemblyInfo> {
        SourceAssemblyInfo::new(
            AnalysisScope::Document(self.tests_document.clone()),
            CancellationToken::new(),
        )
    }
}

/// Adds a declaration node for `symbol` under `parent`.
fn declare(
    builder: &mut SymbolGraphBuilder,
    tree: &mut SyntaxTree,
    parent: NodeId,
    symbol: SymbolId,
) -> NodeId {
    let kind = match builder.symbol_mut(symbol).map(|s| s.kind) {
        Some(SymbolKind::Namespace) => SyntaxKind::NamespaceDeclaration,
        _ => SyntaxKind::TypeDeclaration,
    };
    let node = tree.add_node(parent, kind).unwrap();
    builder.declare(tree.document(), node, symbol);
    node
}

/// ```text
/// CalculatorTests.cs:
///   namespace Sample {
///     public class CalculatorTests {
///       [Fact] public void Adds()
///       [Fact(DisplayName = "Subtracts nicely")] public void Subtracts()
///       [Theory, Trait("Category", "Math"), Trait("Category", "Fast"), Trait("Owner", "qa")]
///       public void Multiplies()
///       public void Helper()
///       [Fact] private void Hidden()
///     }
///     public abstract class BaseTests { [Fact] public void Inherited() }
///     public class DerivedTests : BaseTests {}
///     public class Outer { public class NestedTests { [Fact] public void Works() } }
///   }
/// OtherTests.cs:
///   namespace Sample { public class OtherTests { [Fact] public void Other() } }
/// ```
pub(crate) fn xunit_fixture() -> XunitFixture {
    let mut builder = SymbolGraphBuilder::new("Sample.Tests");

    // Framework types.
    let xunit = builder.namespace_path("Xunit");
    let sdk = builder.namespace_path("Xunit.Sdk");
    let fact = builder.attribute_class(xunit, "FactAttribute", None, Some(true));
    let theory = builder.attribute_class(xunit, "TheoryAttribute", Some(fact), Some(true));
    let trait_interface = builder.interface(sdk, "ITraitAttribute");
    let trait_discoverer = builder.attribute_class(sdk, "TraitDiscovererAttribute", None, None);
    let trait_attribute = builder.attribute_class(xunit, "TraitAttribute", None, Some(true));
    builder
        .symbol_mut(trait_attribute)
        .unwrap()
        .interfaces
        .push(trait_interface);
    builder.apply(
        trait_attribute,
        AttributeData::new(trait_discoverer)
            .with_argument(ConstantValue::from("Xunit.Sdk.TraitDiscoverer"))
            .with_argument(ConstantValue::from("xunit.core")),
    );

    // Test code.
    let sample = builder.namespace_path("Sample");
    let calculator = builder.class(sample, "CalculatorTests");
    let adds = builder.method(calculator, "Adds");
    builder.apply(adds, AttributeData::new(fact));
    let subtracts = builder.method(calculator, "Subtracts");
    builder.apply(
        subtracts,
        AttributeData::new(fact).with_named("DisplayName", ConstantValue::from("Subtracts nicely")),
    );
    let multiplies = builder.method(calculator, "Multiplies");
    builder.apply(multiplies, AttributeData::new(theory));
    for (name, value) in [("Category", "Math"), ("Category", "Fast"), ("Owner", "qa")] {
        builder.apply(
            multiplies,
            AttributeData::new(trait_attribute)
                .with_argument(ConstantValue::from(name))
                .with_argument(ConstantValue::from(value)),
        );
    }
    builder.method(calculator, "Helper");
    let hidden = builder.method(calculator, "Hidden");
    builder.symbol_mut(hidden).unwrap().accessibility = crate::hir::Accessibility::Private;
    builder.apply(hidden, AttributeData::new(fact));

    let base = builder.class(sample, "BaseTests");
    builder.symbol_mut(base).unwrap().is_abstract = true;
    let inherited = builder.method(base, "Inherited");
    builder.apply(inherited, AttributeData::new(fact));
    let derived = builder.derived_class(sample, "DerivedTests", base);

    let outer = builder.class(sample, "Outer");
    let nested = builder.class(outer, "NestedTests");
    let works = builder.method(nested, "Works");
    builder.apply(works, AttributeData::new(fact));

    let other = builder.class(sample, "OtherTests");
    let other_method = builder.method(other, "Other");
    builder.apply(other_method, AttributeData::new(fact));

    // Syntax.
    let mut tests_tree = SyntaxTree::new(DocumentId::new(0), TESTS_PATH);
    let root = tests_tree.root();
    let ns = declare(&mut builder, &mut tests_tree, root, sample);
    for ty in [calculator, base, derived] {
        declare(&mut builder, &mut tests_tree, ns, ty);
    }
    let outer_node = declare(&mut builder, &mut tests_tree, ns, outer);
    declare(&mut builder, &mut tests_tree, outer_node, nested);

    let mut other_tree = SyntaxTree::new(DocumentId::new(1), OTHER_PATH);
    let root = other_tree.root();
    let ns = declare(&mut builder, &mut other_tree, root, sample);
    declare(&mut builder, &mut other_tree, ns, other);

    let project = InMemoryProject::new(ProjectId::new(0), "Sample.Tests");
    project.set_compilation(Some(Arc::new(builder.finish())));
    let tests_document = project.add_document(tests_tree);
    let other_document = project.add_document(other_tree);
    XunitFixture {
        project,
        tests_document,
        other_document,
    }
}

/// An engine test case for `Sample.CalculatorTests.Adds` with the given
/// display name.
pub(crate) fn sample_case(display_name: &str) -> EngineTestCase {
    let fixture = xunit_fixture();
    let assembly = fixture.document_assembly();
    let class = assembly
        .types(false)
        .into_iter()
        .find(|t| t.name() == "Sample.CalculatorTests")
        .unwrap();
    let method = class.methods(false).into_iter().next().unwrap();
    EngineTestCase::new(TestMethod { class, method }, display_name)
}
