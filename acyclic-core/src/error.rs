//! Error Types
//!
//! The graph core has a single failure mode: an edge that would close a
//! directed cycle. Everything that touches the outside world (the renderer,
//! the filesystem, snapshot decoding) reports through [`ExportError`] so the
//! core contract stays a clean success/failure on edge insertion.

use thiserror::Error;

/// Errors raised by graph construction and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Adding `from -> to` would close a directed cycle.
    ///
    /// Raised before any mutation, so the graph is left exactly as it was.
    #[error("cycle detected: edge {from} -> {to} would close a cycle")]
    CycleDetected { from: String, to: String },

    /// A query named an identifier that was never registered.
    #[error("unknown node: {0}")]
    UnknownNode(String),
}

/// Errors raised while exporting a graph to an external collaborator.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The rendering executable could not be found on this host.
    #[error("{program} binary not found, output requires the graphviz package")]
    RendererNotFound { program: String },

    /// The renderer ran but exited unsuccessfully.
    #[error("renderer exited with {status}: {stderr}")]
    RenderFailed { status: String, stderr: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
