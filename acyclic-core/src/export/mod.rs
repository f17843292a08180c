//! Export
//!
//! Everything that turns a graph into something outside the process:
//!
//! - `dot`: Graphviz DOT text
//! - `render`: invocation of an external renderer on that text
//! - `snapshot`: a serde-serializable node/edge listing

mod dot;
mod render;
mod snapshot;

pub use dot::write_dot;
pub use render::{DotRenderer, RenderOptions};
pub use snapshot::{GraphSnapshot, NodeSnapshot};
