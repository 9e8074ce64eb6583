//! Scan the buffer for previously minted addressable nodes.
//!
//! Only working-namespace entry nodes are discoverable as reference targets:
//! an identifier of the form `temp:s<digits>`, declared with an ontology
//! (`:`-prefixed) type, that carries a label statement within the same
//! block. Externally authored identifiers do not match this shape and are
//! deliberately not offered: the index only populates "select an existing
//! node" affordances and never mutates the buffer.

use std::collections::BTreeSet;

use crate::line::{classify, closes_block, strip_trailing_separators, Line};
use crate::LABEL_PREDICATES;

/// One discoverable reference target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    pub id: String,
    pub class_name: String,
    pub label: String,
}

fn is_entry_id(id: &str) -> bool {
    id.strip_prefix("temp:s")
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

fn ontology_class(type_token: &str) -> Option<&str> {
    let name = type_token.strip_prefix(':')?;
    if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

fn strip_quotes(value: &str) -> String {
    value.chars().filter(|c| *c != '"').collect()
}

/// Ordered scan of the buffer; stateless and re-derived on every call.
pub fn scan(text: &str) -> Vec<InstanceRef> {
    let mut out = Vec::new();
    // (id, class) of the entry declaration whose block we are inside,
    // until its first label statement is seen.
    let mut pending: Option<(String, String)> = None;

    for raw in text.lines() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let cleaned = strip_trailing_separators(raw);

        match classify(raw, cleaned) {
            Line::SubjectType {
                subject,
                type_token,
            } => {
                pending = match (is_entry_id(subject), ontology_class(type_token)) {
                    (true, Some(class)) => Some((subject.to_string(), class.to_string())),
                    _ => None,
                };
            }
            Line::Statement { predicate, value } => {
                if LABEL_PREDICATES.contains(&predicate) {
                    if let Some((id, class_name)) = pending.take() {
                        out.push(InstanceRef {
                            id,
                            class_name,
                            label: strip_quotes(value),
                        });
                    }
                }
            }
            Line::BlankOpen { .. } | Line::BlockClose => {
                pending = None;
            }
            Line::Prefix | Line::Other => {}
        }

        if closes_block(raw) {
            pending = None;
        }
    }

    out
}

/// Every identifier the buffer declares with a type statement. The assembler
/// uses this to suppress redundant supporting declarations without ever
/// blocking an entry.
pub fn declared_ids(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for raw in text.lines() {
        let raw = raw.trim();
        if let Line::SubjectType { subject, .. } = classify(raw, strip_trailing_separators(raw)) {
            out.insert(subject.to_string());
        }
    }
    out
}
