//! The discovery orchestrator.
//!
//! ```text
//! Idle ──analyze──→ Running ──engine done──→ Completed
//!                      │
//!                      └──cancelled (any point)──→ Cancelled
//! ```

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use super::context::{DiscoveryContext, TestCase, Trait};
use super::options::DiscovererOptions;
use crate::engine::{
    DiscoveryEngine, DiscoverySink, EngineError, EngineTestCase, FactEngine, FindRequest,
};
use crate::source::SourceAssemblyInfo;
use crate::workspace::AnalysisScope;

/// How a discovery pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Completed,
    /// Cancellation was requested; some tests may already have been reported.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("discovery engine failed to start: {0}")]
    Engine(String),
    #[error("expected a {expected}-scoped discovery context")]
    ScopeMismatch { expected: &'static str },
}

impl From<EngineError> for DiscoveryError {
    fn from(err: EngineError) -> Self {
        DiscoveryError::Engine(err.to_string())
    }
}

#[derive(Debug, Default)]
struct Tally {
    reported: usize,
    rejected: usize,
}

/// Runs a discovery engine against source and reports what it finds.
#[derive(Debug, Default)]
pub struct SourceTestDiscoverer<E = FactEngine> {
    engine: E,
    options: DiscovererOptions,
}

impl<E: DiscoveryEngine> SourceTestDiscoverer<E> {
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, DiscovererOptions::default())
    }

    pub fn with_options(engine: E, options: DiscovererOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &DiscovererOptions {
        &self.options
    }

    /// The executor stamped on every reported test.
    pub fn executor_uri(&self) -> &str {
        &self.options.executor_uri
    }

    /// Discover tests declared in the context's document.
    pub fn analyze_document(
        &self,
        context: &DiscoveryContext,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        match context.scope() {
            AnalysisScope::Document(_) => self.analyze(context),
            AnalysisScope::Project(_) => Err(DiscoveryError::ScopeMismatch {
                expected: "document",
            }),
        }
    }

    /// Discover tests declared anywhere in the context's project.
    pub fn analyze_project(
        &self,
        context: &DiscoveryContext,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        match context.scope() {
            AnalysisScope::Project(_) => self.analyze(context),
            AnalysisScope::Document(_) => Err(DiscoveryError::ScopeMismatch {
                expected: "project",
            }),
        }
    }

    /// Run one pass over whatever the context scopes.
    pub fn analyze(&self, context: &DiscoveryContext) -> Result<DiscoveryOutcome, DiscoveryError> {
        if context.is_cancelled() {
            debug!(scope = ?context.scope(), "discovery cancelled before start");
            return Ok(DiscoveryOutcome::Cancelled);
        }

        let started = Instant::now();
        debug!(scope = ?context.scope(), source = context.source(), "discovery started");

        let assembly = SourceAssemblyInfo::new(
            context.scope().clone(),
            context.cancellation_token().clone(),
        );
        let sink = Arc::new(DiscoverySink::new());
        let request = FindRequest {
            assembly,
            execution_assembly_path: self.options.execution_assembly_path.clone(),
        };
        if let Err(err) = self.engine.find(request, Arc::clone(&sink)) {
            sink.close();
            return Err(err.into());
        }

        let mut tally = Tally::default();
        while !sink.wait_finished(self.options.poll_interval) {
            if context.is_cancelled() {
                break;
            }
            self.send_discovered(context, &sink, &mut tally);
        }
        self.send_discovered(context, &sink, &mut tally);
        // Anything the engine still sends is dropped, and it is told to stop.
        sink.close();

        let outcome = if context.is_cancelled() {
            DiscoveryOutcome::Cancelled
        } else {
            DiscoveryOutcome::Completed
        };
        debug!(
            ?outcome,
            reported = tally.reported,
            rejected = tally.rejected,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "discovery finished"
        );
        Ok(outcome)
    }

    fn send_discovered(&self, context: &DiscoveryContext, sink: &DiscoverySink, tally: &mut Tally) {
        if context.is_cancelled() {
            return;
        }
        for discovered in sink.drain() {
            let test = self.to_test_case(context, discovered);
            match context.report_discovered_test(test) {
                Ok(()) => tally.reported += 1,
                Err(err) => {
                    warn!(error = %err, "rejected discovered test");
                    tally.rejected += 1;
                }
            }
        }
    }

    fn to_test_case(&self, context: &DiscoveryContext, discovered: EngineTestCase) -> TestCase {
        let EngineTestCase {
            test_method,
            display_name,
            source_information,
            traits,
        } = discovered;

        let fully_qualified_name = format!(
            "{}.{}",
            test_method.class.name(),
            test_method.method.name()
        );
        let mut test = TestCase::new(
            fully_qualified_name,
            &self.options.executor_uri,
            context.source(),
        );
        test.display_name = display_name;
        if let Some(source_information) = source_information {
            test.code_file_path = source_information.file_name;
            test.line_number = source_information.line_number;
        }
        test.traits = traits
            .into_iter()
            .flat_map(|(name, values)| {
                values
                    .into_iter()
                    .map(move |value| Trait::new(name.clone(), value))
            })
            .collect();
        test
    }
}
