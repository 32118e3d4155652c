//! Source-based test discovery.
//!
//! A [`SourceTestDiscoverer`] wraps a [`DiscoveryEngine`](crate::engine::DiscoveryEngine),
//! points it at a [`SourceAssemblyInfo`](crate::source::SourceAssemblyInfo) built from a
//! [`DiscoveryContext`], and forwards each test it finds to the context's callback.

mod context;
mod discoverer;
mod options;

pub use context::{DiscoveryContext, ReportError, TestCase, Trait};
pub use discoverer::{DiscoveryError, DiscoveryOutcome, SourceTestDiscoverer};
pub use options::{
    DEFAULT_EXECUTOR_URI, DEFAULT_POLL_INTERVAL, DiscovererOptions, EXECUTION_ASSEMBLY_FILE_NAME,
};
