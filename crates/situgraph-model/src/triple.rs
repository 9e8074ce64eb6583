//! Triple/term model for the constrained Turtle surface.
//!
//! Only the distinctions the parser and assembler actually need are modeled:
//! subjects are namespaced or blank, objects add quoted literals. Predicates
//! stay plain strings; only their local name is semantically used for
//! display.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value", rename_all = "snake_case")]
pub enum Subject {
    /// A namespaced identifier, e.g. `temp:s3` or `:Motion`.
    Named(String),
    /// An anonymous node, identified only within the current parse.
    Blank(String),
}

impl Subject {
    /// The identifier used for node identity in the graph model.
    pub fn id(&self) -> &str {
        match self {
            Subject::Named(id) | Subject::Blank(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value", rename_all = "snake_case")]
pub enum Object {
    /// IRI or prefixed-name reference.
    Reference(String),
    /// Blank-node reference, stored without the `_:` sigil.
    Blank(String),
    /// Quoted literal, stored without the surrounding quotes.
    Literal(String),
}

impl Object {
    /// Surface form as it appears in a statement. Embedded quote characters
    /// in literals are not escaped (known limitation of the surface grammar).
    pub fn render(&self) -> String {
        match self {
            Object::Reference(id) => id.clone(),
            Object::Blank(label) => format!("_:{label}"),
            Object::Literal(value) => format!("\"{value}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Subject,
    pub predicate: String,
    pub object: Object,
}

/// Final segment of a namespaced identifier, split on any of `/`, `#`, `:`.
///
/// `rdfs:label` → `label`, `:has_topic` → `has_topic`, a bare name is
/// returned unchanged.
pub fn local_name(identifier: &str) -> &str {
    identifier
        .rsplit(['/', '#', ':'])
        .next()
        .unwrap_or(identifier)
}
