//! Discovery engine collaborator.
//!
//! An engine inspects an [`AssemblyInfo`] and streams what it finds into a
//! [`DiscoverySink`]. It runs on its own schedule; the discoverer only
//! drains the sink.

mod fact;
mod sink;

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::reflect::{AssemblyInfo, MethodInfo, TypeInfo};

pub use fact::{FACT_ATTRIBUTE, FactEngine, TRAIT_ATTRIBUTE, TRAIT_DISCOVERER_ATTRIBUTE};
pub use sink::{DiscoverySink, SinkMessage};

// ============================================================================
// REQUEST / RESULT SHAPES
// ============================================================================

/// What the engine is asked to inspect.
#[derive(Clone)]
pub struct FindRequest {
    pub assembly: Arc<dyn AssemblyInfo>,
    /// The engine's own execution assembly, for engines that need to load
    /// framework components next to it.
    pub execution_assembly_path: PathBuf,
}

impl std::fmt::Debug for FindRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindRequest")
            .field("assembly", &self.assembly.name())
            .field("execution_assembly_path", &self.execution_assembly_path)
            .finish()
    }
}

/// The declaring type and method of a discovered test.
#[derive(Clone)]
pub struct TestMethod {
    pub class: Arc<dyn TypeInfo>,
    pub method: Arc<dyn MethodInfo>,
}

impl std::fmt::Debug for TestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TestMethod({}.{})",
            self.class.name(),
            self.method.name()
        )
    }
}

/// Where a test is declared, when the engine knows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceInformation {
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
}

/// A test case as the engine reports it.
#[derive(Clone, Debug)]
pub struct EngineTestCase {
    pub test_method: TestMethod,
    pub display_name: String,
    pub source_information: Option<SourceInformation>,
    /// Trait name -> values, in first-seen order.
    pub traits: IndexMap<String, Vec<String>>,
}

impl EngineTestCase {
    pub fn new(test_method: TestMethod, display_name: impl Into<String>) -> Self {
        Self {
            test_method,
            display_name: display_name.into(),
            source_information: None,
            traits: IndexMap::new(),
        }
    }

    /// Append `value` under `name`, keeping earlier values.
    pub fn add_trait(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.traits
            .entry(name.into())
            .or_default()
            .push(value.into());
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// The engine refused to start a discovery pass.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not start discovery thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("{0}")]
    Refused(String),
}

/// A test-discovery engine.
///
/// `find` starts a pass and may return before it finishes. The engine must
/// eventually send [`SinkMessage::DiscoveryComplete`] unless the sink tells
/// it to stop.
pub trait DiscoveryEngine: Send + Sync {
    fn find(&self, request: FindRequest, sink: Arc<DiscoverySink>) -> Result<(), EngineError>;
}

impl<E: DiscoveryEngine + ?Sized> DiscoveryEngine for Arc<E> {
    fn find(&self, request: FindRequest, sink: Arc<DiscoverySink>) -> Result<(), EngineError> {
        (**self).find(request, sink)
    }
}
