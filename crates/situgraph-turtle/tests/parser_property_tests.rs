//! Property tests for the constrained-Turtle surface.
//!
//! The parser must be total (any text yields a best-effort graph, never an
//! error or panic) and every graph it produces must be well-formed: edge
//! endpoints always name existing nodes.

use proptest::prelude::*;

use situgraph_model::FieldKind;
use situgraph_turtle::{assemble, parse_graph, preamble, scan, EntryDraft, FieldValue};

proptest! {
    #[test]
    fn parse_never_panics_and_stays_well_formed(text in "\\PC{0,400}") {
        let graph = parse_graph(&text);
        prop_assert!(graph.is_well_formed());
    }

    #[test]
    fn parse_is_deterministic(text in "\\PC{0,400}") {
        prop_assert_eq!(parse_graph(&text), parse_graph(&text));
    }

    #[test]
    fn assembled_entries_round_trip_through_the_parser(
        lemma in "[a-z]{1,12}",
        class in "[A-Z][a-z]{1,10}",
        entity in "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,2}",
        literal in "[A-Za-z][A-Za-z ]{0,15}",
    ) {
        let draft = EntryDraft {
            shape_id: format!("{class}_shape"),
            lemma: lemma.clone(),
            gloss: None,
            fields: vec![
                FieldValue {
                    predicate_local: "Agent".to_string(),
                    kind: FieldKind::Entity,
                    value: entity,
                },
                FieldValue {
                    predicate_local: "Goal".to_string(),
                    kind: FieldKind::Literal,
                    value: literal,
                },
            ],
        };
        let buffer = format!("{}{}", preamble(), draft.render(1, ""));
        let graph = parse_graph(&buffer);

        prop_assert!(graph.is_well_formed());
        // the entry subject carries its lemma as the display label
        let subject = graph.node("temp:s1").expect("entry node");
        prop_assert_eq!(subject.label.as_str(), lemma.as_str());
        let class_id = format!("Class:{class}");
        prop_assert!(graph.node(&class_id).is_some());
        prop_assert!(graph.edges.iter().any(|e| e.label == "Agent"));
        prop_assert!(graph.edges.iter().any(|e| e.label == "Goal"));
        // entries rendered by the assembler are discoverable again
        let refs = scan(&buffer);
        prop_assert!(refs.iter().any(|r| r.id == "temp:s1"));
    }

    #[test]
    fn entity_supporting_statement_is_emitted_at_most_once(
        value in "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,2}",
    ) {
        let first = assemble(FieldKind::Entity, &value, "Agent", "");
        prop_assert!(!first.supporting.is_empty());
        let second = assemble(FieldKind::Entity, &value, "Goal", &first.supporting);
        prop_assert!(second.supporting.is_empty());
    }
}
