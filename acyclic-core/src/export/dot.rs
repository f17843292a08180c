//! DOT Serialization
//!
//! Emits the graph as a Graphviz `digraph G { ... }` block. Each forward
//! edge becomes one `    parent -> child;` line. Parents appear in
//! node-creation order and each parent's children in edge-insertion order.
//! Isolated nodes produce no line.

use std::fmt;

use crate::graph::{Graph, NodeKey};

/// Write the DOT form of `graph` into `out`.
pub fn write_dot<K, W>(graph: &Graph<K>, out: &mut W) -> fmt::Result
where
    K: NodeKey,
    W: fmt::Write,
{
    writeln!(out, "digraph G {{")?;
    for node in graph.nodes() {
        node.write_dot_fragment(graph.arena(), out)?;
    }
    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let graph: Graph<u32> = Graph::new();
        assert_eq!(graph.to_dot(), "digraph G {\n}\n");
    }

    #[test]
    fn isolated_nodes_have_no_lines() {
        let mut graph = Graph::new();
        graph.add_node("solo");
        graph.add_directed_edge("a", "b").unwrap();
        assert_eq!(graph.to_dot(), "digraph G {\n    a -> b;\n}\n");
    }

    #[test]
    fn node_fragment_follows_insertion_order() {
        let graph = Graph::from_edges([(1, 4), (1, 2), (1, 3)]).unwrap();
        let fragment = graph.dot_fragment(&1).unwrap();
        assert_eq!(fragment, "    1 -> 4;\n    1 -> 2;\n    1 -> 3;\n");
        assert_eq!(graph.dot_fragment(&4).unwrap(), "");
    }

    #[test]
    fn write_dot_streams_into_any_writer() {
        let graph = Graph::from_edges([("x", "y")]).unwrap();
        let mut out = String::from("// header\n");
        write_dot(&graph, &mut out).unwrap();
        assert_eq!(out, "// header\ndigraph G {\n    x -> y;\n}\n");
    }
}
