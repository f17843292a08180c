//! Graph Nodes
//!
//! This module defines the vertex type that lives in the graph arena, along
//! with the edge-insertion algorithm that keeps every node's reachable set an
//! exact transitive closure of its descendants.
//!
//! # Edge Insertion
//!
//! 1. Cycle check: `this -> target` is rejected when `target` can already
//!    reach `this`. A node always reaches itself, so self-loops are rejected
//!    by the same test.
//! 2. Link: append `target` to the forward edges of `this`, and `this` to the
//!    reverse edges of `target`.
//! 3. Propagate: merge the reachable set of `target` into `this`, then walk
//!    reverse edges upward carrying only the ids that were actually added.
//!    An ancestor that gains nothing stops the climb along that path.
//!
//! The check runs before any mutation, so a rejected edge leaves the arena
//! untouched.

use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::hash::Hash;
use std::mem;

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::registry::Graph;
use super::topology;
use crate::error::GraphError;

/// Requirements on a node identifier.
///
/// Any cloneable, hashable value with a textual form works: integers,
/// strings, or a caller-defined key type.
pub trait NodeKey: Clone + Eq + Hash + Display {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + Display {}

/// Stable position of a node inside its owning [`Graph`].
///
/// Indices are assigned in node-creation order and never reused, since
/// nodes are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Get the raw index value.
    pub fn raw(&self) -> usize {
        self.0
    }
}

impl From<usize> for NodeIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Node storage owned by a graph, addressed by [`NodeIndex`].
pub(crate) type Arena<K> = IndexMap<K, GraphNode<K>>;

/// Edge slots are short in practice; keep the common case inline.
pub(crate) type EdgeList = SmallVec<[NodeIndex; 4]>;

/// A vertex in the graph.
#[derive(Debug, Clone)]
pub struct GraphNode<K> {
    /// The vertex value. Immutable after creation.
    id: K,

    /// Children, in insertion order.
    forward: EdgeList,

    /// Parents, in insertion order. Used only for upward propagation.
    reverse: EdgeList,

    /// Every id reachable by following zero or more forward edges.
    reachable: IndexSet<K>,
}

impl<K: NodeKey> GraphNode<K> {
    /// Create a node with no edges that reaches only itself.
    pub fn new(id: K) -> Self {
        let mut reachable = IndexSet::new();
        reachable.insert(id.clone());
        Self {
            id,
            forward: EdgeList::new(),
            reverse: EdgeList::new(),
            reachable,
        }
    }

    /// Get the node's identifier.
    pub fn id(&self) -> &K {
        &self.id
    }

    /// Children of this node, in the order the edges were added.
    pub fn forward_edges(&self) -> &[NodeIndex] {
        &self.forward
    }

    /// Parents of this node, in the order the edges were added.
    pub fn reverse_edges(&self) -> &[NodeIndex] {
        &self.reverse
    }

    /// The ids of every descendant, including this node.
    pub fn reachable(&self) -> &IndexSet<K> {
        &self.reachable
    }

    /// Check whether `id` is reachable from this node.
    pub fn can_reach(&self, id: &K) -> bool {
        self.reachable.contains(id)
    }

    /// Number of forward edges, counting parallel edges separately.
    pub fn out_degree(&self) -> usize {
        self.forward.len()
    }

    /// Number of reverse edges, counting parallel edges separately.
    pub fn in_degree(&self) -> usize {
        self.reverse.len()
    }

    /// Render the DOT edge statements for this node's forward edges.
    ///
    /// Produces one `    {id} -> {child};` line per edge, in insertion
    /// order. A node without children yields an empty string. `graph` must
    /// be the graph that owns this node; the public entry point is
    /// [`Graph::dot_fragment`].
    pub(crate) fn to_dot_fragment(&self, graph: &Graph<K>) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_dot_fragment(graph.arena(), &mut out);
        out
    }

    pub(crate) fn write_dot_fragment<W: fmt::Write>(
        &self,
        nodes: &Arena<K>,
        out: &mut W,
    ) -> fmt::Result {
        for child in &self.forward {
            writeln!(out, "    {} -> {};", self.id, nodes[child.0].id)?;
        }
        Ok(())
    }

    /// Add the forward edge `this -> target`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if `target` already reaches
    /// `this`. Nothing is modified in that case.
    pub(crate) fn add_directed_edge(
        nodes: &mut Arena<K>,
        this: NodeIndex,
        target: NodeIndex,
    ) -> Result<(), GraphError> {
        if nodes[target.0].can_reach(&nodes[this.0].id) {
            let from = nodes[this.0].id.to_string();
            let to = nodes[target.0].id.to_string();
            warn!(%from, %to, "rejected edge: cycle detected");
            return Err(GraphError::CycleDetected { from, to });
        }

        nodes[this.0].forward.push(target);
        nodes[target.0].reverse.push(this);
        debug!(
            from = %nodes[this.0].id,
            to = %nodes[target.0].id,
            "added edge"
        );

        Self::propagate_reachability(nodes, this, target);
        Ok(())
    }

    /// Merge the descendants of `newly_reachable` into `origin` and into
    /// every ancestor of `origin`.
    ///
    /// Breadth-first over reverse edges. Each queue entry carries the ids
    /// the previous node actually gained; an ancestor already containing
    /// all of them is not climbed past. Terminates because the graph is
    /// acyclic.
    fn propagate_reachability(nodes: &mut Arena<K>, origin: NodeIndex, newly_reachable: NodeIndex) {
        let seed: Vec<K> = nodes[newly_reachable.0].reachable.iter().cloned().collect();
        let mut queue = VecDeque::from([(origin, seed)]);

        while let Some((index, incoming)) = queue.pop_front() {
            let node = &mut nodes[index.0];

            let mut added = Vec::new();
            for id in incoming {
                if !node.reachable.contains(&id) {
                    node.reachable.insert(id.clone());
                    added.push(id);
                }
            }

            if added.is_empty() {
                trace!(node = %node.id, "reachability unchanged, stopping");
                continue;
            }

            trace!(node = %node.id, added = added.len(), "propagated reachability");
            for &parent in &node.reverse {
                queue.push_back((parent, added.clone()));
            }
        }
    }

    /// Turn the node at `index` back into an empty node.
    ///
    /// Its edges are unlinked from both neighbours and the reachable set of
    /// every former ancestor is recomputed, so the closure invariant holds
    /// for the whole arena afterwards.
    pub(crate) fn reset(nodes: &mut Arena<K>, index: NodeIndex) {
        let node = &mut nodes[index.0];
        let children = mem::take(&mut node.forward);
        let parents = mem::take(&mut node.reverse);
        node.reachable.clear();
        node.reachable.insert(node.id.clone());

        for child in &children {
            nodes[child.0].reverse.retain(|p| *p != index);
        }
        for parent in &parents {
            nodes[parent.0].forward.retain(|c| *c != index);
        }

        let ancestors = topology::ancestors(nodes, &parents);
        for ancestor in &ancestors {
            let closure = topology::descendant_closure(nodes, *ancestor);
            nodes[ancestor.0].reachable = closure;
        }

        debug!(
            node = %nodes[index.0].id,
            children = children.len(),
            ancestors = ancestors.len(),
            "reset node"
        );
    }
}

// Parent order only steers propagation order, so it is compared as a
// multiset. Child order is observable through DOT output and must match.
impl<K: NodeKey> PartialEq for GraphNode<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.forward == other.forward
            && same_parents(&self.reverse, &other.reverse)
            && self.reachable == other.reachable
    }
}

fn same_parents(a: &EdgeList, b: &EdgeList) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

impl<K: NodeKey> Eq for GraphNode<K> {}

impl<K: Display> Display for GraphNode<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(ids: &[u32]) -> Arena<u32> {
        ids.iter().map(|&id| (id, GraphNode::new(id))).collect()
    }

    fn idx(i: usize) -> NodeIndex {
        NodeIndex::from(i)
    }

    #[test]
    fn new_node_reaches_only_itself() {
        let node = GraphNode::new(7u32);
        assert_eq!(node.id(), &7);
        assert!(node.forward_edges().is_empty());
        assert!(node.reverse_edges().is_empty());
        assert_eq!(node.reachable().len(), 1);
        assert!(node.can_reach(&7));
    }

    #[test]
    fn edge_links_both_directions() {
        let mut nodes = arena(&[1, 2]);
        GraphNode::add_directed_edge(&mut nodes, idx(0), idx(1)).unwrap();

        assert_eq!(nodes[0].forward_edges(), &[idx(1)]);
        assert_eq!(nodes[1].reverse_edges(), &[idx(0)]);
        assert!(nodes[0].can_reach(&2));
        assert!(!nodes[1].can_reach(&1));
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut nodes = arena(&[1]);
        let err = GraphNode::add_directed_edge(&mut nodes, idx(0), idx(0)).unwrap_err();
        assert_eq!(
            err,
            GraphError::CycleDetected {
                from: "1".into(),
                to: "1".into()
            }
        );
        assert!(nodes[0].forward_edges().is_empty());
    }

    #[test]
    fn propagation_reaches_grandparents() {
        // 1 -> 2, then 2 -> 3: node 1 must learn about 3.
        let mut nodes = arena(&[1, 2, 3]);
        GraphNode::add_directed_edge(&mut nodes, idx(0), idx(1)).unwrap();
        GraphNode::add_directed_edge(&mut nodes, idx(1), idx(2)).unwrap();

        assert!(nodes[0].can_reach(&3));
        assert_eq!(nodes[0].reachable().len(), 3);
    }

    #[test]
    fn reset_unlinks_and_recomputes_ancestors() {
        // 1 -> 2 -> 3, reset 2.
        let mut nodes = arena(&[1, 2, 3]);
        GraphNode::add_directed_edge(&mut nodes, idx(0), idx(1)).unwrap();
        GraphNode::add_directed_edge(&mut nodes, idx(1), idx(2)).unwrap();

        GraphNode::reset(&mut nodes, idx(1));

        assert!(nodes[0].forward_edges().is_empty());
        assert!(nodes[1].forward_edges().is_empty());
        assert!(nodes[1].reverse_edges().is_empty());
        assert!(nodes[2].reverse_edges().is_empty());
        assert_eq!(nodes[0].reachable().len(), 1);
        assert_eq!(nodes[1].reachable().len(), 1);
    }

    #[test]
    fn parent_order_does_not_affect_equality() {
        // 1 -> 3 then 2 -> 3, against 2 -> 3 then 1 -> 3.
        let mut first = arena(&[1, 2, 3]);
        GraphNode::add_directed_edge(&mut first, idx(0), idx(2)).unwrap();
        GraphNode::add_directed_edge(&mut first, idx(1), idx(2)).unwrap();

        let mut second = arena(&[1, 2, 3]);
        GraphNode::add_directed_edge(&mut second, idx(1), idx(2)).unwrap();
        GraphNode::add_directed_edge(&mut second, idx(0), idx(2)).unwrap();

        assert_ne!(first[2].reverse_edges(), second[2].reverse_edges());
        assert_eq!(first[2], second[2]);
    }

    #[test]
    fn child_order_affects_equality() {
        let mut first = arena(&[1, 2, 3]);
        GraphNode::add_directed_edge(&mut first, idx(0), idx(1)).unwrap();
        GraphNode::add_directed_edge(&mut first, idx(0), idx(2)).unwrap();

        let mut second = arena(&[1, 2, 3]);
        GraphNode::add_directed_edge(&mut second, idx(0), idx(2)).unwrap();
        GraphNode::add_directed_edge(&mut second, idx(0), idx(1)).unwrap();

        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn display_is_the_id() {
        assert_eq!(GraphNode::new("a").to_string(), "a");
    }
}
