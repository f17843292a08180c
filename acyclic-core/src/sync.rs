//! Shared Graph
//!
//! [`Graph`] itself is single-threaded. `SharedGraph` puts the whole graph
//! behind one lock so it can be used from several threads.
//!
//! # Thread Safety
//!
//! An edge insertion may touch an unbounded number of ancestors while it
//! propagates reachability. The write lock is held for the entire call, so
//! a reader can never observe a half-propagated graph.

use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;

use crate::error::GraphError;
use crate::export::GraphSnapshot;
use crate::graph::{Graph, NodeIndex, NodeKey};

/// A cloneable handle to a graph shared between threads.
#[derive(Debug)]
pub struct SharedGraph<K> {
    inner: Arc<RwLock<Graph<K>>>,
}

impl<K: NodeKey> SharedGraph<K> {
    pub fn new() -> Self {
        Self::from_graph(Graph::new())
    }

    pub fn from_graph(graph: Graph<K>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// See [`Graph::add_node`].
    pub fn add_node(&self, id: K) -> NodeIndex {
        self.inner.write().add_node(id)
    }

    /// See [`Graph::add_directed_edge`].
    pub fn add_directed_edge(&self, from: K, to: K) -> Result<(), GraphError> {
        self.inner.write().add_directed_edge(from, to)
    }

    pub fn can_reach(&self, from: &K, to: &K) -> bool {
        self.inner.read().can_reach(from, to)
    }

    /// Copy of the reachable set of `id`.
    pub fn reachable_from(&self, id: &K) -> Result<IndexSet<K>, GraphError> {
        self.inner.read().reachable_from(id).cloned()
    }

    pub fn to_dot(&self) -> String {
        self.inner.read().to_dot()
    }

    pub fn snapshot(&self) -> GraphSnapshot<K> {
        self.inner.read().snapshot()
    }

    /// Run `f` with shared access to the graph.
    pub fn read<R>(&self, f: impl FnOnce(&Graph<K>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the graph.
    ///
    /// Useful for inserting a batch of edges atomically.
    pub fn write<R>(&self, f: impl FnOnce(&mut Graph<K>) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<K> Clone for SharedGraph<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: NodeKey> Default for SharedGraph<K> {
    fn default() -> Self {
        Self::new()
    }
}
