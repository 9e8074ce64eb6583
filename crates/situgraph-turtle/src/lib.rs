//! Constrained Turtle surface for situgraph.
//!
//! The serialization buffer is a restricted Turtle subset: namespace
//! declarations, subject blocks terminated by `.`, predicate–value statements
//! separated by `;`, quoted literals or bare identifiers as values, and
//! one level of anonymous `[ ... ]` blocks. This crate owns both directions
//! of the transformation:
//!
//! - `assemble`: typed form-field values to statement fragments to append
//!   (plus full entry blocks via [`assemble::EntryDraft`]),
//! - `parse`: full buffer text to the visualization graph model,
//! - `instances`: scan for previously minted addressable nodes.
//!
//! The grammar is deliberately not full Turtle: comments, multi-line
//! collections, and nested blank-node graphs are out of scope, and anything
//! the line classifier does not recognize is skipped without error. A parse
//! always yields a best-effort graph.

pub mod assemble;
pub mod instances;
pub mod line;
pub mod parse;

pub use assemble::{assemble, EntryDraft, FieldValue, Fragments};
pub use instances::{declared_ids, scan, InstanceRef};
pub use parse::parse_graph;

/// Default ontology namespace bound to the bare `:` prefix.
pub const ONTOLOGY_NS: &str = "https://situgraph.example/ontology/";

/// Working namespace for user-minted nodes, bound to `temp:`.
pub const TEMP_NS: &str = "https://situgraph.example/temp/";

/// Prefix carried by every identifier minted in the working namespace.
pub const TEMP_PREFIX: &str = "temp:";

/// Predicates that update a node's display label instead of emitting an edge.
pub const LABEL_PREDICATES: &[&str] = &["rdfs:label", "label"];

/// Metadata predicates that never become edges.
pub const SUPPRESSED_PREDICATES: &[&str] = &["rdf:type", "a", ":lemma", ":synset"];

/// Namespace-declaration preamble every buffer starts with.
pub fn preamble() -> String {
    format!(
        "@prefix :    <{ONTOLOGY_NS}> .\n\
         @prefix temp: <{TEMP_NS}> .\n\
         @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n\
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\n"
    )
}

/// Re-anchor a buffer on the canonical preamble.
///
/// Remote services consume the full document; user edits may have mangled or
/// duplicated the prefix block, so the preamble is stripped (first occurrence
/// only) and prepended fresh.
pub fn normalize_buffer(text: &str) -> String {
    let preamble = preamble();
    let body = text.replacen(&preamble, "", 1);
    format!("{preamble}{}", body.trim_start())
}

/// Display label for an identifier: working-namespace ids drop the prefix
/// and read underscores as spaces, everything else is shown verbatim.
pub fn display_label(id: &str) -> String {
    match id.strip_prefix(TEMP_PREFIX) {
        Some(rest) => rest.replace('_', " "),
        None => id.to_string(),
    }
}

/// True when a predicate local name looks machine-generated: a trailing run
/// of exactly twelve lowercase-hex characters right after an underscore.
/// The inference service mints opaque predicate names of this shape; locally
/// authored predicates are expected not to match.
pub fn is_inferred_predicate(local: &str) -> bool {
    let bytes = local.as_bytes();
    if bytes.len() < 13 {
        return false;
    }
    let (head, tail) = bytes.split_at(bytes.len() - 12);
    head.last() == Some(&b'_')
        && tail
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        let buffer = format!("{}temp:s1 a :Motion .\n", preamble());
        let once = normalize_buffer(&buffer);
        assert_eq!(once, normalize_buffer(&once));
        assert!(once.starts_with("@prefix :"));
    }

    #[test]
    fn normalize_reanchors_bare_text() {
        let normalized = normalize_buffer("temp:s1 a :Motion .\n");
        assert!(normalized.starts_with(&preamble()));
        assert!(normalized.contains("temp:s1 a :Motion ."));
    }

    #[test]
    fn display_label_strips_working_prefix() {
        assert_eq!(display_label("temp:New_York"), "New York");
        assert_eq!(display_label(":Motion"), ":Motion");
        assert_eq!(display_label("_:bnode1"), "_:bnode1");
    }

    #[test]
    fn inferred_heuristic_requires_exactly_twelve_hex() {
        assert!(is_inferred_predicate("motion_4a7b9c1d2e3f"));
        assert!(is_inferred_predicate("_4a7b9c1d2e3f"));
        assert!(!is_inferred_predicate("has_topic"));
        assert!(!is_inferred_predicate("x_4A7B9C1D2E3F")); // uppercase hex
        assert!(!is_inferred_predicate("x_4a7b9c1d2e3")); // eleven
        assert!(!is_inferred_predicate("x_4a7b9c1d2e3f0")); // thirteen
        assert!(!is_inferred_predicate("4a7b9c1d2e3f")); // no underscore
    }
}
