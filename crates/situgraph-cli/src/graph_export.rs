//! Graph model export for external renderers.
//!
//! The force-directed renderer is an external collaborator; it consumes the
//! parsed `{nodes, edges}` as JSON. DOT output is provided for quick
//! inspection with Graphviz: class/instance/literal nodes get distinct
//! styling and inferred edges render dashed.

use anyhow::{anyhow, Result};

use situgraph_model::{GraphModel, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Json,
    Dot,
}

impl GraphFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "dot" => Ok(Self::Dot),
            other => Err(anyhow!("unknown graph format `{other}` (expected json|dot)")),
        }
    }
}

pub fn render(graph: &GraphModel, format: GraphFormat) -> Result<String> {
    match format {
        GraphFormat::Json => Ok(serde_json::to_string_pretty(graph)?),
        GraphFormat::Dot => Ok(render_dot(graph)),
    }
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_style(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Class => "shape=ellipse, style=filled, fillcolor=\"#10b981\"",
        NodeKind::Instance => "shape=box, style=filled, fillcolor=\"#f59e0b\"",
        NodeKind::Literal => "shape=note, style=filled, fillcolor=\"#3b82f6\"",
    }
}

pub fn render_dot(graph: &GraphModel) -> String {
    let mut out = String::new();
    out.push_str("digraph situgraph {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [fontname=\"Helvetica\"];\n");
    out.push_str("  edge [fontname=\"Helvetica\"];\n\n");

    for node in &graph.nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", {}];\n",
            dot_escape(&node.id),
            dot_escape(&node.label),
            node_style(node.kind)
        ));
    }
    out.push('\n');
    for edge in &graph.edges {
        let style = if edge.inferred { ", style=dashed" } else { "" };
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"{}];\n",
            dot_escape(&edge.source),
            dot_escape(&edge.target),
            dot_escape(&edge.label),
            style
        ));
    }
    out.push_str("}\n");
    out
}
