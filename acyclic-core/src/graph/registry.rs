//! Graph Registry
//!
//! The registry owns every node in an insertion-ordered arena keyed by the
//! node identifier. Nodes are created lazily the first time an id is
//! mentioned, either explicitly through [`Graph::add_node`] or as an endpoint
//! of [`Graph::add_directed_edge`], and live as long as the graph.
//!
//! Node positions in the arena double as [`NodeIndex`] values. Since nodes
//! are never removed, an index handed out once stays valid for the lifetime
//! of the graph.

use std::fmt;

use indexmap::IndexSet;
use tracing::{debug, warn};

use super::node::{Arena, GraphNode, NodeIndex, NodeKey};
use super::topology;
use crate::error::GraphError;
use crate::export;

/// An append-only directed acyclic graph.
///
/// # Example
///
/// ```rust
/// use acyclic_core::graph::Graph;
///
/// let mut g = Graph::new();
/// g.add_directed_edge(1, 2).unwrap();
/// g.add_directed_edge(2, 3).unwrap();
///
/// assert!(g.can_reach(&1, &3));
/// assert!(g.add_directed_edge(3, 1).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Graph<K> {
    nodes: Arena<K>,
}

impl<K: NodeKey> Graph<K> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Arena::default(),
        }
    }

    /// Build a graph by inserting `edges` in order.
    ///
    /// Stops at the first edge that would close a cycle.
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (K, K)>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_directed_edge(from, to)?;
        }
        Ok(graph)
    }

    /// Register a node.
    ///
    /// Calling this is never required, since edge insertion creates nodes as
    /// needed. If `id` is already present, that node is reset: its edges are
    /// unlinked, its reachable set shrinks back to itself, and every former
    /// ancestor's reachable set is recomputed. The node keeps its position.
    pub fn add_node(&mut self, id: K) -> NodeIndex {
        match self.nodes.get_index_of(&id) {
            Some(index) => {
                let index = NodeIndex::from(index);
                GraphNode::reset(&mut self.nodes, index);
                index
            }
            None => self.insert_node(id),
        }
    }

    /// Add the edge `from -> to`, creating either endpoint if missing.
    ///
    /// Existing nodes are reused as they are; only [`Graph::add_node`]
    /// resets a node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if `to` can already reach
    /// `from`, including the self-loop `from == to`. A rejected call
    /// registers no nodes.
    pub fn add_directed_edge(&mut self, from: K, to: K) -> Result<(), GraphError> {
        // A fresh node reaches nothing but itself, so a self-loop is the only
        // rejection possible with a missing endpoint. Catch it before
        // anything is created.
        if from == to {
            let id = from.to_string();
            warn!(from = %id, to = %id, "rejected edge: cycle detected");
            return Err(GraphError::CycleDetected { from: id.clone(), to: id });
        }
        let from = self.ensure_node(from);
        let to = self.ensure_node(to);
        GraphNode::add_directed_edge(&mut self.nodes, from, to)
    }

    /// Check whether adding `from -> to` would be rejected, without
    /// modifying the graph.
    pub fn would_create_cycle(&self, from: &K, to: &K) -> bool {
        if from == to {
            return true;
        }
        self.can_reach(to, from)
    }

    fn ensure_node(&mut self, id: K) -> NodeIndex {
        match self.nodes.get_index_of(&id) {
            Some(index) => NodeIndex::from(index),
            None => self.insert_node(id),
        }
    }

    fn insert_node(&mut self, id: K) -> NodeIndex {
        debug!(node = %id, "created node");
        let (index, _) = self.nodes.insert_full(id.clone(), GraphNode::new(id));
        NodeIndex::from(index)
    }

    /// Check whether `id` has been registered.
    pub fn contains(&self, id: &K) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get a node by id.
    pub fn node(&self, id: &K) -> Option<&GraphNode<K>> {
        self.nodes.get(id)
    }

    /// Get a node by arena position.
    pub fn node_at(&self, index: NodeIndex) -> Option<&GraphNode<K>> {
        self.nodes.get_index(index.raw()).map(|(_, node)| node)
    }

    /// Get the arena position of `id`.
    pub fn index_of(&self, id: &K) -> Option<NodeIndex> {
        self.nodes.get_index_of(id).map(NodeIndex::from)
    }

    /// Iterate over nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode<K>> {
        self.nodes.values()
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of forward edges, counting parallel edges separately.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.out_degree()).sum()
    }

    /// Iterate over edges as `(parent, child)` id pairs.
    ///
    /// Parents follow node-creation order and each parent's children follow
    /// edge-insertion order, which is the order the DOT output uses.
    pub fn edges(&self) -> impl Iterator<Item = (&K, &K)> {
        self.nodes.values().flat_map(move |node| {
            node.forward_edges()
                .iter()
                .map(move |child| (node.id(), self.nodes[child.raw()].id()))
        })
    }

    /// Get every id reachable from `id`, including `id` itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `id` was never registered.
    pub fn reachable_from(&self, id: &K) -> Result<&IndexSet<K>, GraphError> {
        self.nodes
            .get(id)
            .map(GraphNode::reachable)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    /// Check whether a directed path `from -> ... -> to` exists.
    ///
    /// Every node reaches itself. Unknown ids reach nothing.
    pub fn can_reach(&self, from: &K, to: &K) -> bool {
        self.nodes.get(from).is_some_and(|node| node.can_reach(to))
    }

    /// Order the ids so that every parent precedes its children.
    pub fn topological_order(&self) -> Vec<&K> {
        topology::topological_order(&self.nodes)
            .into_iter()
            .map(|index| self.nodes[index.raw()].id())
            .collect()
    }

    /// Render the DOT edge lines for the forward edges of `id`.
    ///
    /// Returns `None` if `id` was never registered, and an empty string for
    /// a node without children.
    pub fn dot_fragment(&self, id: &K) -> Option<String> {
        self.nodes.get(id).map(|node| node.to_dot_fragment(self))
    }

    /// Render the graph as a Graphviz `digraph G { ... }` block.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = export::write_dot(self, &mut out);
        out
    }

    pub(crate) fn arena(&self) -> &Arena<K> {
        &self.nodes
    }
}

impl<K> Default for Graph<K> {
    fn default() -> Self {
        Self {
            nodes: Arena::default(),
        }
    }
}

// Node order is significant: edge slots refer to arena positions. Per-node
// parent order is not; see `GraphNode`'s `PartialEq`.
impl<K: NodeKey> PartialEq for Graph<K> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len() && self.nodes.iter().eq(other.nodes.iter())
    }
}

impl<K: NodeKey> Eq for Graph<K> {}

impl<K: NodeKey> fmt::Display for Graph<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.values().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
