//! Builds the documented six-node graph, prints its DOT form, and renders it
//! to `graph.png` when Graphviz is installed.
//!
//! Run with: cargo run --example scenario

use acyclic_core::export::{DotRenderer, RenderOptions};
use acyclic_core::graph::Graph;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut g = Graph::new();
    g.add_node(1);
    for (from, to) in [(1, 2), (1, 3), (1, 4), (2, 5), (3, 6), (4, 3), (4, 6), (5, 6)] {
        g.add_directed_edge(from, to)?;
    }

    print!("{}", g.to_dot());

    let renderer = DotRenderer::new(RenderOptions::default());
    if renderer.is_available().await {
        let path = renderer.render(&g).await?;
        println!("created {}", std::env::current_dir()?.join(path).display());
    } else {
        println!("dot not found, skipping image output");
    }

    for (from, to) in [(1, 1), (6, 1)] {
        if let Err(e) = g.add_directed_edge(from, to) {
            println!("{e}");
        }
    }

    Ok(())
}
