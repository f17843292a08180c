//! External Renderer
//!
//! Hands DOT text to a Graphviz-compatible command-line tool to produce an
//! image file. The graph core knows nothing about this step; it only
//! produces the text.
//!
//! # Procedure
//!
//! 1. Probe the tool with `<program> -V`. A missing tool is reported as
//!    [`ExportError::RendererNotFound`] before anything is written.
//! 2. Write the DOT text to `dot_path`.
//! 3. Run `<program> -T<format> <dot_path> -o <output_path>`.
//! 4. Remove `dot_path` unless `keep_dot_file` is set, whether or not the
//!    tool succeeded.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::process::Command;
use tracing::{error, info};

use crate::error::ExportError;
use crate::graph::{Graph, NodeKey};

/// Settings for [`DotRenderer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Renderer executable, looked up on `PATH` when not absolute.
    pub program: String,
    /// Output format passed as `-T<format>`.
    pub format: String,
    /// Where the intermediate DOT file is written.
    pub dot_path: PathBuf,
    /// Where the rendered image is written.
    pub output_path: PathBuf,
    /// Keep the intermediate DOT file after rendering.
    pub keep_dot_file: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            program: "dot".to_string(),
            format: "png".to_string(),
            dot_path: PathBuf::from("temp.dot"),
            output_path: PathBuf::from("graph.png"),
            keep_dot_file: false,
        }
    }
}

impl RenderOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Renders graphs to image files through an external executable.
#[derive(Debug, Clone, Default)]
pub struct DotRenderer {
    options: RenderOptions,
}

impl DotRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Check whether the renderer can be launched on this host.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.options.program)
            .arg("-V")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|status| status.success())
    }

    /// Render `graph` and return the path of the produced image.
    pub async fn render<K: NodeKey>(&self, graph: &Graph<K>) -> Result<PathBuf, ExportError> {
        let dot = graph.to_dot();
        self.render_dot(&dot).await
    }

    /// Render already-serialized DOT text.
    pub async fn render_dot(&self, dot: &str) -> Result<PathBuf, ExportError> {
        let RenderOptions {
            program,
            format,
            dot_path,
            output_path,
            keep_dot_file,
        } = &self.options;

        if !self.is_available().await {
            error!(%program, "renderer not found");
            return Err(ExportError::RendererNotFound {
                program: program.clone(),
            });
        }

        fs::write(dot_path, dot).await?;
        info!(%program, dot = %dot_path.display(), output = %output_path.display(), "rendering graph");

        let result = Command::new(program)
            .arg(format!("-T{format}"))
            .arg(dot_path)
            .arg("-o")
            .arg(output_path)
            .stdin(Stdio::null())
            .output()
            .await;

        if !keep_dot_file {
            remove_quietly(dot_path).await;
        }

        let output = result?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(%program, status = %output.status, %stderr, "renderer failed");
            return Err(ExportError::RenderFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        info!(output = %output_path.display(), "rendered graph");
        Ok(output_path.clone())
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        error!(path = %path.display(), error = %e, "failed to remove dot file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_graphviz_png() {
        let options = RenderOptions::default();
        assert_eq!(options.program, "dot");
        assert_eq!(options.format, "png");
        assert_eq!(options.dot_path, PathBuf::from("temp.dot"));
        assert_eq!(options.output_path, PathBuf::from("graph.png"));
        assert!(!options.keep_dot_file);
    }

    #[test]
    fn options_from_partial_json() {
        let options =
            RenderOptions::from_json(r#"{ "format": "svg", "keep_dot_file": true }"#).unwrap();
        assert_eq!(options.format, "svg");
        assert!(options.keep_dot_file);
        assert_eq!(options.program, "dot");
    }

    #[test]
    fn options_reject_wrong_types() {
        assert!(RenderOptions::from_json(r#"{ "keep_dot_file": "yes" }"#).is_err());
    }

    #[tokio::test]
    async fn missing_renderer_is_reported_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let dot_path = dir.path().join("graph.dot");
        let renderer = DotRenderer::new(RenderOptions {
            program: "acyclic-no-such-renderer".to_string(),
            dot_path: dot_path.clone(),
            output_path: dir.path().join("graph.png"),
            ..RenderOptions::default()
        });

        assert!(!renderer.is_available().await);

        let graph = Graph::from_edges([(1, 2)]).unwrap();
        let err = renderer.render(&graph).await.unwrap_err();
        assert!(matches!(
            err,
            ExportError::RendererNotFound { ref program } if program == "acyclic-no-such-renderer"
        ));
        assert!(!dot_path.exists());
    }
}
