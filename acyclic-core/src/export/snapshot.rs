//! Graph Snapshots
//!
//! A snapshot records the nodes in creation order and, for each node, its
//! children in edge-insertion order. Reachable sets are not stored: they are
//! derived, and rebuilding through the normal insertion path recomputes them
//! and re-validates acyclicity.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, GraphError};
use crate::graph::{Graph, NodeKey};

/// One node and its forward edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot<K> {
    pub id: K,
    #[serde(default = "Vec::new")]
    pub children: Vec<K>,
}

/// Serializable form of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot<K> {
    pub nodes: Vec<NodeSnapshot<K>>,
}

impl<K: Serialize> GraphSnapshot<K> {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<K: DeserializeOwned> GraphSnapshot<K> {
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K: NodeKey> Graph<K> {
    /// Capture the nodes and edges of this graph.
    pub fn snapshot(&self) -> GraphSnapshot<K> {
        let nodes = self
            .nodes()
            .map(|node| NodeSnapshot {
                id: node.id().clone(),
                children: node
                    .forward_edges()
                    .iter()
                    .filter_map(|&child| self.node_at(child))
                    .map(|child| child.id().clone())
                    .collect(),
            })
            .collect();
        GraphSnapshot { nodes }
    }

    /// Rebuild a graph from a snapshot.
    ///
    /// All listed nodes are registered first, in order, then every edge is
    /// replayed. A snapshot describing a cycle fails with
    /// [`GraphError::CycleDetected`].
    pub fn from_snapshot(snapshot: &GraphSnapshot<K>) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for node in &snapshot.nodes {
            graph.add_node(node.id.clone());
        }
        for node in &snapshot.nodes {
            for child in &node.children {
                graph.add_directed_edge(node.id.clone(), child.clone())?;
            }
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_keeps_isolated_nodes_and_order() {
        let mut graph = Graph::new();
        graph.add_node(9);
        graph.add_directed_edge(1, 3).unwrap();
        graph.add_directed_edge(1, 2).unwrap();

        let snapshot = graph.snapshot();
        let ids: Vec<_> = snapshot.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![9, 1, 3, 2]);
        assert_eq!(snapshot.nodes[1].children, vec![3, 2]);
        assert!(snapshot.nodes[0].children.is_empty());
    }

    #[test]
    fn rebuilt_graph_is_identical() {
        let graph = Graph::from_edges([("a", "b"), ("b", "c"), ("a", "c")]).unwrap();
        let rebuilt = Graph::from_snapshot(&graph.snapshot()).unwrap();
        assert_eq!(rebuilt, graph);
        assert_eq!(rebuilt.to_dot(), graph.to_dot());
    }

    #[test]
    fn cyclic_snapshot_is_rejected() {
        let json = r#"{
            "nodes": [
                { "id": 1, "children": [2] },
                { "id": 2, "children": [1] }
            ]
        }"#;
        let snapshot: GraphSnapshot<u32> = GraphSnapshot::from_json(json).unwrap();
        let err = Graph::from_snapshot(&snapshot).unwrap_err();
        assert_eq!(
            err,
            GraphError::CycleDetected {
                from: "2".into(),
                to: "1".into()
            }
        );
    }

    #[test]
    fn children_default_to_empty() {
        let snapshot: GraphSnapshot<String> =
            GraphSnapshot::from_json(r#"{ "nodes": [{ "id": "lonely" }] }"#).unwrap();
        let graph = Graph::from_snapshot(&snapshot).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct Tag(u32);

    impl std::fmt::Display for Tag {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "t{}", self.0)
        }
    }

    #[test]
    fn keys_without_default_deserialize() {
        let json = r#"{ "nodes": [{ "id": 1, "children": [2] }, { "id": 2 }] }"#;
        let snapshot: GraphSnapshot<Tag> = GraphSnapshot::from_json(json).unwrap();
        assert!(snapshot.nodes[1].children.is_empty());
        let graph = Graph::from_snapshot(&snapshot).unwrap();
        assert_eq!(graph.to_dot(), "digraph G {\n    t1 -> t2;\n}\n");
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let graph = Graph::from_edges([(1u64, 2u64), (2, 3)]).unwrap();
        let json = graph.snapshot().to_json().unwrap();
        let decoded: GraphSnapshot<u64> = GraphSnapshot::from_json(&json).unwrap();
        assert_eq!(Graph::from_snapshot(&decoded).unwrap(), graph);
    }

    #[test]
    fn malformed_json_is_a_snapshot_error() {
        let err = GraphSnapshot::<u32>::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ExportError::Snapshot(_)));
    }
}
