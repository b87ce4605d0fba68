//! Dependency tree for diagnostics.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

const PIPE: &str = "│   ";
const SPACE: &str = "    ";
const TEE: &str = "├── ";
const ELBOW: &str = "└── ";

/// What a tree node refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A scanned LaTeX source
    Source,
    /// A leaf graphics asset
    Graphic,
}

impl NodeKind {
    fn marker(self) -> &'static str {
        match self {
            NodeKind::Source => "📄",
            NodeKind::Graphic => "🖼",
        }
    }
}

/// A file in the include hierarchy.
///
/// A file included from several places is expanded only under its first
/// includer; later includes produce no node at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepNode {
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Distance from the main document (root = 0)
    pub depth: usize,
    pub children: Vec<DepNode>,
}

impl DepNode {
    pub fn source(path: impl Into<PathBuf>, depth: usize) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::Source,
            depth,
            children: Vec::new(),
        }
    }

    pub fn graphic(path: impl Into<PathBuf>, depth: usize) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::Graphic,
            depth,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DepNode::node_count).sum::<usize>()
    }

    /// Depth-first walk over this subtree.
    pub fn walk(&self) -> Vec<&DepNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    /// Box-drawing rendering, one line per node, file names only.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![self.label()];
        self.render_children("", &mut lines);
        lines
    }

    fn render_children(&self, indent: &str, lines: &mut Vec<String>) {
        for (i, child) in self.children.iter().enumerate() {
            let is_last = i + 1 == self.children.len();
            let branch = if is_last { ELBOW } else { TEE };
            lines.push(format!("{indent}{branch}{}", child.label()));

            let next_indent = format!("{indent}{}", if is_last { SPACE } else { PIPE });
            child.render_children(&next_indent, lines);
        }
    }

    fn label(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!("{} {name}", self.kind.marker())
    }

    /// Log the rendered tree between rules.
    pub fn log(&self) {
        info!("Dependency Tree:");
        info!("===============");
        for line in self.render_lines() {
            info!("{line}");
        }
        info!("===============");
    }
}

impl fmt::Display for DepNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.render_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
