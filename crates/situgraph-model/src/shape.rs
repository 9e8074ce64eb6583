//! Shape / field metadata from the remote metadata service.
//!
//! The metadata service publishes, per target shape, the form fields a user
//! fills in. This workspace only reads `label` and `path` to pick predicate
//! local names; everything else is UI concern.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::triple::local_name;

/// How a form field's raw value is interpreted by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Points at an already-declared node picked via the instance index.
    Reference,
    /// Mints a fresh working-namespace entity from the raw value.
    Entity,
    /// Quoted scalar value.
    Literal,
    /// IRI, qualified with the default namespace when bare.
    Iri,
    /// Blank-node reference.
    BlankNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("unknown field kind `{0}` (expected reference|entity|literal|iri|bnode)")]
    UnknownFieldKind(String),
}

impl FieldKind {
    pub fn parse(s: &str) -> Result<Self, ShapeError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "ref" | "instance" => Ok(Self::Reference),
            "entity" => Ok(Self::Entity),
            "literal" | "lit" => Ok(Self::Literal),
            "iri" => Ok(Self::Iri),
            "bnode" | "blank" | "_:" => Ok(Self::BlankNode),
            other => Err(ShapeError::UnknownFieldKind(other.to_string())),
        }
    }
}

/// One form field as published by the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub label: String,
    /// Property path IRI; `unknown` (or empty) means no SHACL path was
    /// declared and the field label is used instead.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    /// Predicate local name for this field: the final path segment when a
    /// usable path is present, else the field label.
    pub fn predicate_local(&self) -> &str {
        if self.path.is_empty() || self.path == "unknown" {
            &self.label
        } else {
            local_name(&self.path)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeFields {
    pub fields: Vec<FieldSpec>,
}

/// Shape identifier → field definitions, loaded once per session.
pub type ShapeCatalog = BTreeMap<String, ShapeFields>;

/// Display class name for a shape identifier (`Motion_shape` → `Motion`).
pub fn shape_class_name(shape_id: &str) -> &str {
    shape_id.strip_suffix("_shape").unwrap_or(shape_id)
}
