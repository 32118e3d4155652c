//! A minimal xUnit-style engine over the reflection surface.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{
    DiscoveryEngine, DiscoverySink, EngineError, EngineTestCase, FindRequest, SinkMessage,
    TestMethod,
};
use crate::reflect::AttributeInfo;

/// Marks a test method. Subclasses (`TheoryAttribute`) match too.
pub const FACT_ATTRIBUTE: &str = "Xunit.FactAttribute";
/// Implemented by attributes that contribute traits.
pub const TRAIT_ATTRIBUTE: &str = "Xunit.Sdk.ITraitAttribute";
/// Applied to a trait attribute type to name the code that reads it.
pub const TRAIT_DISCOVERER_ATTRIBUTE: &str = "Xunit.Sdk.TraitDiscovererAttribute";

/// Finds `[Fact]` methods on a background thread.
///
/// - abstract types are skipped (their tests surface through subclasses)
/// - only public methods are considered
/// - the display name is the `DisplayName` named argument, else `Type.Method`
/// - traits come from the class and then the method
#[derive(Clone, Debug, Default)]
pub struct FactEngine;

impl FactEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run one pass to completion on the calling thread.
    pub fn run(request: &FindRequest, sink: &DiscoverySink) {
        debug!(
            assembly = ?request.assembly.name(),
            execution_assembly = %request.execution_assembly_path.display(),
            "fact discovery started"
        );
        let mut reported = 0usize;
        for class in request.assembly.types(false) {
            if class.is_abstract() {
                trace!(class = class.name(), "skipping abstract type");
                continue;
            }
            let class_traits = traits_of(&class.custom_attributes(TRAIT_ATTRIBUTE));
            for method in class.methods(false) {
                let facts = method.custom_attributes(FACT_ATTRIBUTE);
                let Some(fact) = facts.first() else {
                    continue;
                };
                let display_name = fact
                    .named_argument("DisplayName")
                    .and_then(|value| value.as_str().map(str::to_string))
                    .unwrap_or_else(|| format!("{}.{}", class.name(), method.name()));

                let mut test_case = EngineTestCase::new(
                    TestMethod {
                        class: Arc::clone(&class),
                        method: Arc::clone(&method),
                    },
                    display_name,
                );
                let method_traits = traits_of(&method.custom_attributes(TRAIT_ATTRIBUTE));
                for (name, value) in class_traits.iter().chain(&method_traits) {
                    test_case.add_trait(name.as_str(), value.as_str());
                }

                if !sink.on_message(SinkMessage::TestCaseDiscovered(test_case)) {
                    debug!(reported, "sink closed, stopping early");
                    return;
                }
                reported += 1;
            }
        }
        debug!(reported, "fact discovery finished");
        sink.on_message(SinkMessage::DiscoveryComplete);
    }
}

/// `(name, value)` pairs from trait attributes that declare a discoverer.
fn traits_of(attributes: &[Arc<dyn AttributeInfo>]) -> Vec<(String, String)> {
    attributes
        .iter()
        .filter(|attribute| {
            !attribute
                .custom_attributes(TRAIT_DISCOVERER_ATTRIBUTE)
                .is_empty()
        })
        .filter_map(|attribute| {
            let arguments = attribute.constructor_arguments();
            match arguments.as_slice() {
                [name, value, ..] => {
                    Some((name.as_str()?.to_string(), value.as_str()?.to_string()))
                }
                _ => None,
            }
        })
        .collect()
}

impl DiscoveryEngine for FactEngine {
    fn find(&self, request: FindRequest, sink: Arc<DiscoverySink>) -> Result<(), EngineError> {
        std::thread::Builder::new()
            .name("fact-discovery".into())
            .spawn(move || Self::run(&request, &sink))?;
        Ok(())
    }
}
