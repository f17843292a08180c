//! Acyclic Core
//!
//! This crate provides an append-only directed acyclic graph with eager
//! cycle prevention. It implements:
//!
//! - Incremental edge insertion that rejects any edge closing a cycle
//! - Cached, always-exact reachable sets for constant-time cycle checks
//! - Graphviz DOT export and external rendering
//! - JSON snapshots and a lock-protected shared graph
//!
//! The crate is designed to be used both as a native Rust library and, with
//! the `python` feature, as a Python extension module via PyO3.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Nodes, the owning registry, and topology queries
//! - `error`: Core and export error types
//! - `export`: DOT text, the renderer collaborator, and snapshots
//! - `sync`: A thread-safe wrapper around the graph
//!
//! # Example
//!
//! ```rust
//! use acyclic_core::graph::Graph;
//! use acyclic_core::GraphError;
//!
//! let mut g = Graph::new();
//! g.add_node(1);
//! g.add_directed_edge(1, 2).unwrap();
//! g.add_directed_edge(2, 3).unwrap();
//!
//! // 3 already reaches back to 1.
//! assert!(matches!(
//!     g.add_directed_edge(3, 1),
//!     Err(GraphError::CycleDetected { .. })
//! ));
//!
//! print!("{}", g.to_dot());
//! ```

pub mod error;
pub mod export;
pub mod graph;
pub mod sync;

#[cfg(feature = "python")]
mod python;

pub use error::{ExportError, GraphError};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
///
/// This function is called by Python when importing the module.
/// It registers all Python-exposed types and functions.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register(m)?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
