//! Situgraph data model
//!
//! This crate defines the shared, serde-friendly types the rest of the
//! workspace communicates with:
//!
//! - the visualization-facing graph model (`graph`): nodes, edges, and the
//!   `{nodes, edges}` bundle handed to external renderers,
//! - the triple/term model (`triple`): subjects, predicates, objects as they
//!   appear in the constrained Turtle surface,
//! - shape/field metadata (`shape`): the form definitions fetched from the
//!   remote metadata service, read-only to this workspace.
//!
//! The graph model is *derived* data: it is recomputed from the serialization
//! buffer on every parse, so node identity is only meaningful within one
//! parse pass.

pub mod graph;
pub mod shape;
pub mod triple;

pub use graph::{Edge, GraphModel, Node, NodeKind};
pub use shape::{shape_class_name, FieldKind, FieldSpec, ShapeCatalog, ShapeFields};
pub use triple::{local_name, Object, Subject, Triple};
