//! Visualization-facing graph model.
//!
//! A `GraphModel` is what the external force-directed renderer consumes. It
//! carries no behavior beyond a well-formedness check: every edge endpoint
//! must name a node that is present in `nodes`. The parser upholds that by
//! minting referenced nodes before (or at the point) an edge is emitted.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Node category, used by renderers for sizing and coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Synthesized from a type token; not present verbatim in the text.
    Class,
    /// An addressable entity (named or blank).
    Instance,
    /// A quoted scalar value, keyed by (value, owning subject).
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique within one parse pass.
    pub id: String,
    /// Display label; mutable after creation (label statements fold in).
    pub label: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Predicate local name (final segment after a namespace separator).
    pub label: String,
    /// True when the predicate matches the machine-generated naming
    /// heuristic used by the inference service.
    pub inferred: bool,
}

/// The `{nodes, edges}` bundle handed to the external renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphModel {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphModel {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Every edge endpoint refers to a node present in `nodes`.
    pub fn is_well_formed(&self) -> bool {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .all(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
    }
}
