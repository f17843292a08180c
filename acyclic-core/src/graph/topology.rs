//! Topology Queries
//!
//! Whole-graph walks that do not rely on the cached reachable sets: full
//! closure recomputation (used when a node is reset), ancestor collection,
//! and topological ordering.
//!
//! # Topological Order
//!
//! Kahn's algorithm over forward edges:
//!
//! 1. Count in-degrees (parallel edges count once per occurrence)
//! 2. Seed the queue with every zero in-degree node, in creation order
//! 3. Pop a node, emit it, decrement the in-degree of its children
//! 4. Children that reach zero join the back of the queue
//!
//! Ties are broken by node-creation order, so the result is deterministic.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexSet;

use super::node::{Arena, NodeIndex, NodeKey};

/// Recompute the set of ids reachable from `start` by walking forward edges.
pub(crate) fn descendant_closure<K: NodeKey>(nodes: &Arena<K>, start: NodeIndex) -> IndexSet<K> {
    let mut visited = HashSet::new();
    let mut closure = IndexSet::new();
    let mut stack = vec![start];

    while let Some(index) = stack.pop() {
        if !visited.insert(index) {
            continue;
        }
        let node = &nodes[index.raw()];
        closure.insert(node.id().clone());
        stack.extend(node.forward_edges().iter().rev().copied());
    }

    closure
}

/// Collect `seeds` and every node above them, each exactly once.
pub(crate) fn ancestors<K: NodeKey>(nodes: &Arena<K>, seeds: &[NodeIndex]) -> Vec<NodeIndex> {
    let mut visited = HashSet::new();
    let mut result = Vec::new();
    let mut queue: VecDeque<NodeIndex> = seeds.iter().copied().collect();

    while let Some(index) = queue.pop_front() {
        if !visited.insert(index) {
            continue;
        }
        result.push(index);
        queue.extend(nodes[index.raw()].reverse_edges().iter().copied());
    }

    result
}

/// Order every node so that parents come before their children.
pub(crate) fn topological_order<K: NodeKey>(nodes: &Arena<K>) -> Vec<NodeIndex> {
    let mut in_degree: Vec<usize> = nodes.values().map(|n| n.in_degree()).collect();
    let mut queue: VecDeque<NodeIndex> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(i, _)| NodeIndex::from(i))
        .collect();
    let mut result = Vec::with_capacity(nodes.len());

    while let Some(index) = queue.pop_front() {
        result.push(index);
        for child in nodes[index.raw()].forward_edges() {
            let degree = &mut in_degree[child.raw()];
            *degree = degree.saturating_sub(1);
            if *degree == 0 {
                queue.push_back(*child);
            }
        }
    }

    result
}
