//! Python Bindings
//!
//! Exposes an integer-keyed graph to Python. Rejected edges raise
//! `CycleError`, a subclass of `ValueError`.

use pyo3::create_exception;
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;

use crate::error::GraphError;
use crate::graph::Graph;

create_exception!(_core, CycleError, PyValueError);

fn to_py_err(err: GraphError) -> PyErr {
    match err {
        GraphError::CycleDetected { .. } => CycleError::new_err(err.to_string()),
        GraphError::UnknownNode(_) => PyKeyError::new_err(err.to_string()),
    }
}

/// Python-exposed graph type.
#[pyclass(name = "Graph")]
#[derive(Default)]
pub struct PyGraph {
    graph: Graph<i64>,
}

#[pymethods]
impl PyGraph {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Register a node, resetting it if it already exists.
    fn add_node(&mut self, id: i64) {
        self.graph.add_node(id);
    }

    /// Add the edge `parent -> child`, creating nodes as needed.
    fn add_directed_edge(&mut self, parent: i64, child: i64) -> PyResult<()> {
        self.graph.add_directed_edge(parent, child).map_err(to_py_err)
    }

    /// Ids reachable from `id`, including `id`, in discovery order.
    fn reachable(&self, id: i64) -> PyResult<Vec<i64>> {
        self.graph
            .reachable_from(&id)
            .map(|set| set.iter().copied().collect())
            .map_err(to_py_err)
    }

    fn can_reach(&self, parent: i64, child: i64) -> bool {
        self.graph.can_reach(&parent, &child)
    }

    fn to_dot(&self) -> String {
        self.graph.to_dot()
    }

    fn __len__(&self) -> usize {
        self.graph.node_count()
    }

    fn __str__(&self) -> String {
        self.graph.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "Graph(nodes={}, edges={})",
            self.graph.node_count(),
            self.graph.edge_count()
        )
    }
}

/// Register the Python-facing types on `m`.
pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGraph>()?;
    m.add("CycleError", m.py().get_type_bound::<CycleError>())?;
    Ok(())
}
