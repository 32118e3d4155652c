//! Discovery context and the host-side test case record.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::workspace::{AnalysisScope, Document, Project};

/// A name/value tag on a test case.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trait {
    pub name: String,
    pub value: String,
}

impl Trait {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A discovered test, in the shape the host's test platform expects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestCase {
    /// `Namespace.Type.Method`, nested types joined with `+`.
    pub fully_qualified_name: String,
    pub executor_uri: String,
    /// Build output path of the containing project.
    pub source: String,
    pub display_name: String,
    pub code_file_path: Option<String>,
    pub line_number: Option<u32>,
    pub traits: Vec<Trait>,
}

impl TestCase {
    pub fn new(
        fully_qualified_name: impl Into<String>,
        executor_uri: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            fully_qualified_name: fully_qualified_name.into(),
            executor_uri: executor_uri.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    /// First blank required field, checked in reporting order.
    fn missing_field(&self) -> Option<&'static str> {
        [
            ("FullyQualifiedName", &self.fully_qualified_name),
            ("DisplayName", &self.display_name),
            ("Source", &self.source),
            ("ExecutorUri", &self.executor_uri),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// A test was rejected at the report boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("discovered test has a blank `{field}`")]
    MissingField { field: &'static str },
}

type ReportFn = dyn Fn(TestCase) + Send + Sync;

/// Everything one discovery invocation needs from its caller.
pub struct DiscoveryContext {
    scope: AnalysisScope,
    report: Box<ReportFn>,
    source: String,
    cancel: CancellationToken,
}

impl DiscoveryContext {
    pub fn new(
        scope: AnalysisScope,
        report: impl Fn(TestCase) + Send + Sync + 'static,
        source: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            scope,
            report: Box::new(report),
            source: source.into(),
            cancel,
        }
    }

    /// Discover tests declared in one document.
    pub fn document(
        document: Arc<dyn Document>,
        report: impl Fn(TestCase) + Send + Sync + 'static,
        source: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self::new(AnalysisScope::Document(document), report, source, cancel)
    }

    /// Discover tests declared anywhere in a project.
    pub fn project(
        project: Arc<dyn Project>,
        report: impl Fn(TestCase) + Send + Sync + 'static,
        source: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self::new(AnalysisScope::Project(project), report, source, cancel)
    }

    pub fn scope(&self) -> &AnalysisScope {
        &self.scope
    }

    /// Expected to be the project's build output path.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Validate `test` and hand it to the caller.
    ///
    /// A test with a blank name, display name, source or executor is
    /// rejected and never reaches the callback.
    pub fn report_discovered_test(&self, test: TestCase) -> Result<(), ReportError> {
        if let Some(field) = test.missing_field() {
            return Err(ReportError::MissingField { field });
        }
        (self.report)(test);
        Ok(())
    }
}

impl std::fmt::Debug for DiscoveryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryContext")
            .field("scope", &self.scope)
            .field("source", &self.source)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
