//! Discoverer configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;

/// How often the discoverer wakes to drain results and check cancellation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Executor that runs the tests this discoverer reports.
pub const DEFAULT_EXECUTOR_URI: &str = "executor://xunit/VsTestRunner2";

/// File name of the engine's execution assembly.
pub const EXECUTION_ASSEMBLY_FILE_NAME: &str = "xunit.execution.desktop.dll";

/// [`EXECUTION_ASSEMBLY_FILE_NAME`] next to the running executable.
static DEFAULT_EXECUTION_ASSEMBLY_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let directory = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    directory.join(EXECUTION_ASSEMBLY_FILE_NAME)
});

/// Options for a [`SourceTestDiscoverer`](super::SourceTestDiscoverer).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiscovererOptions {
    /// Upper bound on one wait for results (default: 50 ms).
    pub poll_interval: Duration,
    /// Stamped on every reported test case.
    pub executor_uri: String,
    /// Handed to the engine as its execution assembly.
    pub execution_assembly_path: PathBuf,
}

impl Default for DiscovererOptions {
    fn default() -> Self {
        DiscovererOptions {
            poll_interval: DEFAULT_POLL_INTERVAL,
            executor_uri: DEFAULT_EXECUTOR_URI.to_string(),
            execution_assembly_path: DEFAULT_EXECUTION_ASSEMBLY_PATH.clone(),
        }
    }
}

impl DiscovererOptions {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_executor_uri(mut self, uri: impl Into<String>) -> Self {
        self.executor_uri = uri.into();
        self
    }

    pub fn with_execution_assembly_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.execution_assembly_path = path.into();
        self
    }
}
