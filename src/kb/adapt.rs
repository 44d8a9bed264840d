use std::collections::HashMap;

use thiserror::Error;

use super::graph::{EntityNode, KnowledgeGraph, RelationEdge};
use super::payload::KnowledgeBasePayload;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MalformedGraphError {
    #[error("relation {index} ({label:?}) references unknown entity {id:?} as {role}")]
    DanglingRelation {
        index: usize,
        label: String,
        id: String,
        role: &'static str,
    },
}

/// Builds the node/edge model from a fetched payload: one node per entity
/// key in document order, one edge per relation in sequence order, with
/// head/tail/type renamed to source/target/label. A relation naming an
/// unknown entity fails the whole build; parallel edges are kept as-is.
pub fn adapt(payload: KnowledgeBasePayload) -> Result<KnowledgeGraph, MalformedGraphError> {
    let mut nodes = Vec::with_capacity(payload.entities.len());
    let mut index_by_id = HashMap::with_capacity(payload.entities.len());

    for (id, _metadata) in payload.entities {
        // serde_json already collapses duplicate document keys (last value
        // wins); the guard keeps the unique-id invariant for payloads built
        // in code.
        if index_by_id.contains_key(&id) {
            continue;
        }
        index_by_id.insert(id.clone(), nodes.len());
        nodes.push(EntityNode { id });
    }

    let mut edges = Vec::with_capacity(payload.relations.len());
    for (index, relation) in payload.relations.into_iter().enumerate() {
        for (id, role) in [(&relation.head, "head"), (&relation.tail, "tail")] {
            if !index_by_id.contains_key(id) {
                return Err(MalformedGraphError::DanglingRelation {
                    index,
                    label: relation.relation_type,
                    id: id.clone(),
                    role,
                });
            }
        }

        edges.push(RelationEdge {
            source: relation.head,
            target: relation.tail,
            label: relation.relation_type,
        });
    }

    Ok(KnowledgeGraph::new(nodes, edges, index_by_id))
}

#[cfg(test)]
mod tests {
    use super::super::payload::KnowledgeBasePayload;
    use super::{MalformedGraphError, adapt};

    fn payload_from(json: &str) -> KnowledgeBasePayload {
        serde_json::from_str(json).expect("test payload parses")
    }

    #[test]
    fn one_node_per_entity_and_one_edge_per_relation() {
        let graph = adapt(payload_from(
            r#"{
                "entities": {"Dam": {}, "Stream": {"note": 1}},
                "relations": [{"head": "Dam", "tail": "Stream", "type": "subclass of"}]
            }"#,
        ))
        .expect("valid payload adapts");

        assert_eq!(
            graph.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            ["Dam", "Stream"]
        );
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].source, "Dam");
        assert_eq!(graph.edges[0].target, "Stream");
        assert_eq!(graph.edges[0].label, "subclass of");
        assert_eq!(graph.index_of("Stream"), Some(1));
    }

    #[test]
    fn entity_order_follows_the_document() {
        let graph = adapt(payload_from(
            r#"{"entities": {"c": {}, "a": {}, "b": {}}, "relations": []}"#,
        ))
        .expect("valid payload adapts");

        assert_eq!(
            graph.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            ["c", "a", "b"]
        );
    }

    #[test]
    fn parallel_relations_are_not_deduplicated() {
        let graph = adapt(payload_from(
            r#"{
                "entities": {"Dam": {}, "Flood": {}},
                "relations": [
                    {"head": "Dam", "tail": "Flood", "type": "use"},
                    {"head": "Dam", "tail": "Flood", "type": "has effect"}
                ]
            }"#,
        ))
        .expect("valid payload adapts");

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges[0].label, "use");
        assert_eq!(graph.edges[1].label, "has effect");
    }

    #[test]
    fn dangling_relation_is_rejected() {
        let error = adapt(payload_from(
            r#"{
                "entities": {"Dam": {}},
                "relations": [{"head": "Dam", "tail": "Missing", "type": "use"}]
            }"#,
        ))
        .expect_err("dangling tail must fail the build");

        assert_eq!(
            error,
            MalformedGraphError::DanglingRelation {
                index: 0,
                label: "use".to_owned(),
                id: "Missing".to_owned(),
                role: "tail",
            }
        );
    }

    #[test]
    fn dangling_head_names_its_role() {
        let error = adapt(payload_from(
            r#"{
                "entities": {"Stream": {}},
                "relations": [
                    {"head": "Stream", "tail": "Stream", "type": "self"},
                    {"head": "Ghost", "tail": "Stream", "type": "use"}
                ]
            }"#,
        ))
        .expect_err("dangling head must fail the build");

        match error {
            MalformedGraphError::DanglingRelation { index, id, role, .. } => {
                assert_eq!(index, 1);
                assert_eq!(id, "Ghost");
                assert_eq!(role, "head");
            }
        }
    }

    #[test]
    fn duplicate_entity_keys_collapse_to_one_node() {
        // serde_json keeps a single entry per key; the adapter must never
        // emit two nodes with the same id.
        let graph = adapt(payload_from(
            r#"{"entities": {"Dam": {"v": 1}, "Dam": {"v": 2}}, "relations": []}"#,
        ))
        .expect("duplicate keys adapt");

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.nodes[0].id, "Dam");
    }

    #[test]
    fn empty_payload_yields_an_empty_graph() {
        let graph = adapt(KnowledgeBasePayload::default()).expect("empty payload adapts");
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
