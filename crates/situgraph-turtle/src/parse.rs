//! Buffer text → visualization graph model.
//!
//! A small two-state machine (`NoSubject` / inside a subject block) driven by
//! the line classifier. The parse is total: malformed lines emit nothing and
//! never error, so any text degrades gracefully to a partial graph. Nodes are
//! deduplicated per call; a fresh blank-node counter starts at zero each
//! call, so blank identifiers are not stable across parses.

use std::collections::HashMap;

use situgraph_model::{local_name, Edge, GraphModel, Node, NodeKind, Subject};

use crate::line::{classify, closes_block, strip_trailing_separators, Line};
use crate::{display_label, is_inferred_predicate, LABEL_PREDICATES, SUPPRESSED_PREDICATES};

/// Display label minted for anonymous blocks carrying an inline type.
const BLANK_NODE_LABEL: &str = "Situation";

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    by_id: HashMap<String, usize>,
}

impl GraphBuilder {
    /// Mint a node once per id; later calls are no-ops (labels are only
    /// updated through `set_label`).
    fn get_or_create(&mut self, id: &str, label: &str, kind: NodeKind) {
        if !self.by_id.contains_key(id) {
            self.by_id.insert(id.to_string(), self.nodes.len());
            self.nodes.push(Node {
                id: id.to_string(),
                label: label.to_string(),
                kind,
            });
        }
    }

    fn set_label(&mut self, id: &str, label: &str) {
        if let Some(&i) = self.by_id.get(id) {
            self.nodes[i].label = label.to_string();
        }
    }

    fn push_edge(&mut self, source: &str, target: &str, label: &str, inferred: bool) {
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
            inferred,
        });
    }

    fn finish(self) -> GraphModel {
        GraphModel {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// Class-node local name for a type token: text after the last `:`, with
/// angle brackets removed.
fn class_local(type_token: &str) -> String {
    type_token
        .rsplit(':')
        .next()
        .unwrap_or(type_token)
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect()
}

fn strip_quotes(value: &str) -> String {
    value.chars().filter(|c| *c != '"').collect()
}

/// Parse the full serialization buffer into `{nodes, edges}`.
///
/// Deterministic, pure function of `text`; every edge endpoint is minted
/// before the edge is emitted, so the result is always well-formed.
pub fn parse_graph(text: &str) -> GraphModel {
    let mut builder = GraphBuilder::default();
    let mut blank_count: u32 = 0;
    let mut subject: Option<Subject> = None;

    for raw in text.lines() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let cleaned = strip_trailing_separators(raw);

        match classify(raw, cleaned) {
            Line::Prefix | Line::BlockClose | Line::Other => {}
            Line::BlankOpen { type_token } => {
                blank_count += 1;
                let id = format!("_:bnode{blank_count}");
                subject = Some(Subject::Blank(id.clone()));
                if let Some(ty) = type_token {
                    let ty_local = class_local(ty);
                    builder.get_or_create(&id, BLANK_NODE_LABEL, NodeKind::Instance);
                    let class_id = format!("Class:{ty_local}");
                    builder.get_or_create(&class_id, &ty_local, NodeKind::Class);
                    builder.push_edge(&id, &class_id, "type", false);
                }
            }
            Line::SubjectType {
                subject: subj,
                type_token,
            } => {
                let ty_local = class_local(type_token);
                subject = Some(Subject::Named(subj.to_string()));
                builder.get_or_create(subj, &display_label(subj), NodeKind::Instance);
                let class_id = format!("Class:{ty_local}");
                builder.get_or_create(&class_id, &ty_local, NodeKind::Class);
                builder.push_edge(subj, &class_id, "type", false);
            }
            Line::Statement { predicate, value } => {
                if let Some(subj) = &subject {
                    handle_statement(&mut builder, subj.id(), predicate, value);
                }
            }
        }

        if closes_block(raw) {
            subject = None;
        }
    }

    builder.finish()
}

fn handle_statement(builder: &mut GraphBuilder, subject: &str, predicate: &str, value: &str) {
    if LABEL_PREDICATES.contains(&predicate) {
        builder.set_label(subject, &strip_quotes(value));
        return;
    }
    if SUPPRESSED_PREDICATES.contains(&predicate) {
        return;
    }

    let pred_local = local_name(predicate);
    let inferred = is_inferred_predicate(pred_local);

    // Edge endpoints must exist in the node list; the subject may be a bare
    // blank block that never declared a type.
    builder.get_or_create(subject, &display_label(subject), NodeKind::Instance);

    if value.starts_with('"') {
        let literal = strip_quotes(value);
        let literal_id = format!("Lit:{literal}_{subject}");
        builder.get_or_create(&literal_id, &format!("\"{literal}\""), NodeKind::Literal);
        builder.push_edge(subject, &literal_id, pred_local, inferred);
    } else {
        builder.get_or_create(value, &display_label(value), NodeKind::Instance);
        builder.push_edge(subject, value, pred_local, inferred);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preamble;

    const ENTRY: &str = r#"temp:s1 a :Motion ;
    rdfs:label "abandon" ;
    :lemma "abandon" ;
    :synset "leave behind" ;
    :Agent temp:the_captain ;
    :Goal "the harbor" .
temp:the_captain a :Entity ;
    rdfs:label "the captain" .
"#;

    fn parse_entry() -> GraphModel {
        parse_graph(&format!("{}{}", preamble(), ENTRY))
    }

    #[test]
    fn subject_declaration_yields_instance_class_and_type_edge() {
        let g = parse_entry();
        let s1 = g.node("temp:s1").expect("subject node");
        assert_eq!(s1.kind, NodeKind::Instance);
        // label statement folded into the node, identifier not shown
        assert_eq!(s1.label, "abandon");

        let class = g.node("Class:Motion").expect("class node");
        assert_eq!(class.kind, NodeKind::Class);
        assert_eq!(class.label, "Motion");

        assert!(g
            .edges
            .iter()
            .any(|e| e.source == "temp:s1" && e.target == "Class:Motion" && e.label == "type"));
    }

    #[test]
    fn metadata_predicates_emit_no_edges() {
        let g = parse_entry();
        assert!(!g.edges.iter().any(|e| e.label == "lemma" || e.label == "synset"));
        assert!(!g.edges.iter().any(|e| e.label == "label"));
    }

    #[test]
    fn literal_values_are_keyed_by_subject() {
        let g = parse_entry();
        let lit = g.node("Lit:the harbor_temp:s1").expect("literal node");
        assert_eq!(lit.kind, NodeKind::Literal);
        assert_eq!(lit.label, "\"the harbor\"");
        assert!(g
            .edges
            .iter()
            .any(|e| e.source == "temp:s1" && e.target == lit.id && e.label == "Goal"));
    }

    #[test]
    fn identical_literals_under_distinct_subjects_stay_distinct() {
        let text = "temp:s1 a :Motion ;\n    :Goal \"home\" .\n\
                    temp:s2 a :Motion ;\n    :Goal \"home\" .\n";
        let g = parse_graph(text);
        assert!(g.node("Lit:home_temp:s1").is_some());
        assert!(g.node("Lit:home_temp:s2").is_some());
        assert_eq!(g.nodes_of_kind(NodeKind::Literal).count(), 2);
    }

    #[test]
    fn repeated_subject_value_pairs_collapse() {
        let text = "temp:s1 a :Motion ;\n    :Goal \"home\" ;\n    :Source \"home\" .\n";
        let g = parse_graph(text);
        assert_eq!(g.nodes_of_kind(NodeKind::Literal).count(), 1);
        assert_eq!(g.edges.iter().filter(|e| e.target == "Lit:home_temp:s1").count(), 2);
    }

    #[test]
    fn reference_values_mint_instance_nodes_with_derived_labels() {
        let g = parse_entry();
        let target = g.node("temp:the_captain").expect("reference target");
        assert_eq!(target.kind, NodeKind::Instance);
        // label statement in its own block overrides the derived label
        assert_eq!(target.label, "the captain");
        assert!(g
            .edges
            .iter()
            .any(|e| e.source == "temp:s1" && e.target == "temp:the_captain" && e.label == "Agent"));
    }

    #[test]
    fn inferred_edge_detection() {
        let text = "temp:s1 a :Motion ;\n    :motion_4a7b9c1d2e3f temp:s2 ;\n    :has_topic temp:s3 .\n";
        let g = parse_graph(text);
        let inferred = g.edges.iter().find(|e| e.label == "motion_4a7b9c1d2e3f").unwrap();
        assert!(inferred.inferred);
        let authored = g.edges.iter().find(|e| e.label == "has_topic").unwrap();
        assert!(!authored.inferred);
    }

    #[test]
    fn anonymous_block_with_inline_type() {
        let text = "[ a :Motion ;\n    :Agent temp:crew\n] .\n";
        let g = parse_graph(text);
        let blank = g.node("_:bnode1").expect("blank node");
        assert_eq!(blank.label, "Situation");
        assert!(g
            .edges
            .iter()
            .any(|e| e.source == "_:bnode1" && e.target == "Class:Motion" && e.label == "type"));
        assert!(g
            .edges
            .iter()
            .any(|e| e.source == "_:bnode1" && e.target == "temp:crew" && e.label == "Agent"));
        assert!(g.is_well_formed());
    }

    #[test]
    fn statement_terminator_resets_the_subject() {
        // the dangling statement after the terminator has no subject and is dropped
        let text = "temp:s1 a :Motion ;\n    :Goal \"home\" .\n    :Agent temp:ghost ;\n";
        let g = parse_graph(text);
        assert!(!g.edges.iter().any(|e| e.label == "Agent"));
        assert!(g.node("temp:ghost").is_none());
    }

    #[test]
    fn malformed_lines_are_skipped_silently() {
        let text = "???\ntemp:s1 a :Motion .\n<<<>>>\njust-one-token\n";
        let g = parse_graph(text);
        assert!(g.node("temp:s1").is_some());
        assert!(g.is_well_formed());
    }

    #[test]
    fn reparse_is_deterministic() {
        let text = format!("{}{}", preamble(), ENTRY);
        assert_eq!(parse_graph(&text), parse_graph(&text));
    }

    #[test]
    fn distinct_types_get_distinct_class_nodes() {
        let text = "temp:s1 a :Motion .\ntemp:s2 a :Transfer .\ntemp:s3 a :Motion .\n";
        let g = parse_graph(text);
        assert_eq!(g.nodes_of_kind(NodeKind::Class).count(), 2);
        assert_eq!(g.nodes_of_kind(NodeKind::Instance).count(), 3);
        assert_eq!(g.edges.iter().filter(|e| e.label == "type").count(), 3);
    }

    #[test]
    fn angle_bracketed_types_lose_their_brackets() {
        let g = parse_graph("temp:s1 a <Motion> .\n");
        assert!(g.node("Class:Motion").is_some());
    }
}
