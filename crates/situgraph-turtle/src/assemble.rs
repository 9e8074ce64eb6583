//! Form-field values → serialized statement fragments.
//!
//! The assembler is side-effect free: it returns text fragments and leaves
//! appending to the buffer (and advancing the entry counter) to the caller.
//! An `Entity`-kind field may additionally return a *supporting* statement
//! declaring the freshly minted node; that declaration is suppressed when the
//! identifier is already declared somewhere in the existing text, tracked
//! through an explicit declared-identifier set rather than a substring probe.
//! Suppression only ever skips the redundant declaration; it never blocks
//! the user's entry.

use std::collections::BTreeSet;

use situgraph_model::shape::shape_class_name;
use situgraph_model::{FieldKind, Object};

use crate::instances::declared_ids;
use crate::TEMP_PREFIX;

/// Fragments produced for one field value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    /// Edge fragment attached to the current subject, starting with the
    /// statement separator (` ;\n    ...`).
    pub main: String,
    /// Standalone supporting statement for a newly minted entity, or empty.
    pub supporting: String,
}

/// Characters unsafe in a minted identifier; everything else passes through.
const SLUG_STRIPPED: &[char] = &['<', '>', '"', '{', '}', '|', '\\', '^', '`'];

/// Identifier slug for a raw entity value: whitespace runs become single
/// underscores, syntactically unsafe characters are dropped.
pub fn slug(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| !SLUG_STRIPPED.contains(c))
        .collect()
}

fn quote(value: &str) -> String {
    Object::Literal(value.to_string()).render()
}

fn edge_fragment(predicate_local: &str, object: &Object) -> String {
    format!(" ;\n    :{predicate_local} {}", object.render())
}

/// Assemble against an evolving declared-identifier set. Newly minted entity
/// ids are inserted so that later fields in the same entry suppress their own
/// duplicates too.
pub(crate) fn assemble_against(
    kind: FieldKind,
    raw_value: &str,
    predicate_local: &str,
    declared: &mut BTreeSet<String>,
) -> Fragments {
    let value = raw_value.trim();
    let mut out = Fragments::default();

    let object = match kind {
        // The value was picked from the instance index; no existence check
        // is performed here.
        FieldKind::Reference => Object::Reference(value.to_string()),
        FieldKind::Entity => {
            let id = format!("{TEMP_PREFIX}{}", slug(value));
            if declared.insert(id.clone()) {
                out.supporting = format!("{id} a :Entity ;\n    rdfs:label {} .\n", quote(value));
            }
            Object::Reference(id)
        }
        // Embedded quote characters are not escaped (known limitation of the
        // surface grammar).
        FieldKind::Literal => Object::Literal(value.to_string()),
        FieldKind::Iri => {
            if value.starts_with('<') || value.contains(':') {
                Object::Reference(value.to_string())
            } else {
                Object::Reference(format!(":{value}"))
            }
        }
        FieldKind::BlankNode => {
            Object::Blank(value.strip_prefix("_:").unwrap_or(value).to_string())
        }
    };

    out.main = edge_fragment(predicate_local, &object);
    out
}

/// Assemble the fragments for one field value.
///
/// `raw_value` is assumed non-empty after trimming; empty values are skipped
/// by the caller before reaching the assembler.
pub fn assemble(
    kind: FieldKind,
    raw_value: &str,
    predicate_local: &str,
    existing_text: &str,
) -> Fragments {
    let mut declared = declared_ids(existing_text);
    assemble_against(kind, raw_value, predicate_local, &mut declared)
}

/// One filled-in form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub predicate_local: String,
    pub kind: FieldKind,
    pub value: String,
}

/// Everything needed to render one complete entry block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    /// Selected target shape, e.g. `Motion_shape`.
    pub shape_id: String,
    /// The lemma under entry; becomes both the label and `:lemma` value.
    pub lemma: String,
    /// Optional sense gloss, recorded as `:synset`.
    pub gloss: Option<String>,
    pub fields: Vec<FieldValue>,
}

impl EntryDraft {
    /// Render the full text to append for this entry: the main subject block
    /// (type, label, metadata, one statement per non-empty field), then any
    /// supporting entity declarations.
    pub fn render(&self, entry_number: u64, existing_text: &str) -> String {
        let class_name = shape_class_name(&self.shape_id);
        let subject = format!("{TEMP_PREFIX}s{entry_number}");

        let mut main = format!(
            "{subject} a :{class_name} ;\n    rdfs:label {lemma} ;\n    :lemma {lemma}",
            lemma = quote(&self.lemma)
        );
        if let Some(gloss) = &self.gloss {
            main.push_str(&format!(" ;\n    :synset {}", quote(gloss)));
        }

        let mut entity_blocks = String::new();
        let mut declared = declared_ids(existing_text);
        for field in &self.fields {
            if field.value.trim().is_empty() {
                continue;
            }
            let fragments = assemble_against(
                field.kind,
                &field.value,
                &field.predicate_local,
                &mut declared,
            );
            main.push_str(&fragments.main);
            entity_blocks.push_str(&fragments.supporting);
        }

        format!("{main} .\n{entity_blocks}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_mints_slug_and_supporting_statement() {
        let f = assemble(FieldKind::Entity, "New York", "Goal", "");
        assert_eq!(f.main, " ;\n    :Goal temp:New_York");
        assert_eq!(
            f.supporting,
            "temp:New_York a :Entity ;\n    rdfs:label \"New York\" .\n"
        );
    }

    #[test]
    fn entity_supporting_statement_suppressed_when_already_declared() {
        let existing = "temp:New_York a :Entity ;\n    rdfs:label \"New York\" .\n";
        let f = assemble(FieldKind::Entity, "New York", "Goal", existing);
        assert_eq!(f.main, " ;\n    :Goal temp:New_York");
        assert!(f.supporting.is_empty());
    }

    #[test]
    fn literal_is_quoted_with_no_supporting_statement() {
        let f = assemble(FieldKind::Literal, "Paris", "Goal", "");
        assert_eq!(f.main, " ;\n    :Goal \"Paris\"");
        assert!(f.supporting.is_empty());
    }

    #[test]
    fn reference_passes_the_identifier_through() {
        let f = assemble(FieldKind::Reference, "temp:s3", "Agent", "");
        assert_eq!(f.main, " ;\n    :Agent temp:s3");
        assert!(f.supporting.is_empty());
    }

    #[test]
    fn iri_qualification_rules() {
        assert_eq!(
            assemble(FieldKind::Iri, "<http://example.org/x>", "see", "").main,
            " ;\n    :see <http://example.org/x>"
        );
        assert_eq!(
            assemble(FieldKind::Iri, "rdfs:seeAlso", "see", "").main,
            " ;\n    :see rdfs:seeAlso"
        );
        assert_eq!(
            assemble(FieldKind::Iri, "Motion", "see", "").main,
            " ;\n    :see :Motion"
        );
    }

    #[test]
    fn blank_node_sigil_is_added_once() {
        assert_eq!(
            assemble(FieldKind::BlankNode, "b1", "via", "").main,
            " ;\n    :via _:b1"
        );
        assert_eq!(
            assemble(FieldKind::BlankNode, "_:b1", "via", "").main,
            " ;\n    :via _:b1"
        );
    }

    #[test]
    fn slug_collapses_whitespace_and_strips_unsafe_chars() {
        assert_eq!(slug("  New   York  "), "New_York");
        assert_eq!(slug("a<b>\"c\"{d}|e\\f^g`h"), "abcdefgh");
    }

    #[test]
    fn entry_render_builds_the_full_block() {
        let draft = EntryDraft {
            shape_id: "Motion_shape".to_string(),
            lemma: "abandon".to_string(),
            gloss: Some("leave behind".to_string()),
            fields: vec![
                FieldValue {
                    predicate_local: "Agent".to_string(),
                    kind: FieldKind::Entity,
                    value: "the captain".to_string(),
                },
                FieldValue {
                    predicate_local: "Goal".to_string(),
                    kind: FieldKind::Literal,
                    value: "the harbor".to_string(),
                },
                FieldValue {
                    predicate_local: "Path".to_string(),
                    kind: FieldKind::Literal,
                    value: "   ".to_string(), // empty after trim: skipped
                },
            ],
        };
        let text = draft.render(1, "");
        assert!(text.starts_with("temp:s1 a :Motion ;\n    rdfs:label \"abandon\" ;\n    :lemma \"abandon\""));
        assert!(text.contains(" ;\n    :synset \"leave behind\""));
        assert!(text.contains(" ;\n    :Agent temp:the_captain"));
        assert!(text.contains(" ;\n    :Goal \"the harbor\" .\n"));
        assert!(text.contains("temp:the_captain a :Entity ;\n    rdfs:label \"the captain\" .\n"));
        assert!(!text.contains(":Path"));
    }

    #[test]
    fn entry_render_suppresses_duplicates_within_one_entry() {
        let draft = EntryDraft {
            shape_id: "Transfer".to_string(),
            lemma: "hand".to_string(),
            gloss: None,
            fields: vec![
                FieldValue {
                    predicate_local: "Donor".to_string(),
                    kind: FieldKind::Entity,
                    value: "the captain".to_string(),
                },
                FieldValue {
                    predicate_local: "Recipient".to_string(),
                    kind: FieldKind::Entity,
                    value: "the captain".to_string(),
                },
            ],
        };
        let text = draft.render(2, "");
        assert_eq!(text.matches("temp:the_captain a :Entity").count(), 1);
        assert_eq!(text.matches(":Donor temp:the_captain").count(), 1);
        assert_eq!(text.matches(":Recipient temp:the_captain").count(), 1);
    }
}
