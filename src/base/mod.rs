//! Foundation types for the discovery bridge.
//!
//! This module provides the handles used throughout the crate:
//! - [`SymbolId`] - Handle to a symbol in one compilation
//! - [`NodeId`] - Handle to a node in one syntax tree
//! - [`DocumentId`], [`ProjectId`] - Workspace identities
//!
//! This module has NO dependencies on other crate modules.

mod ids;

pub use ids::{DocumentId, NodeId, ProjectId, SymbolId};
