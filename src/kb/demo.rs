use serde_json::{Map, Value};

use super::payload::{KnowledgeBasePayload, RawRelation};

pub const DEMO_NAME: &str = "demo";

/// Fixed three-node example graph, served without a network round trip so
/// the viewer can be exercised offline. Goes through the same adapter and
/// session path as fetched payloads.
pub fn demo_payload() -> KnowledgeBasePayload {
    let mut entities = Map::new();
    for id in ["Dam", "Stream", "Flood"] {
        entities.insert(id.to_owned(), Value::Object(Map::new()));
    }

    let relations = [
        ("Dam", "Stream", "subclass of"),
        ("Dam", "Flood", "use"),
        ("Dam", "Flood", "has effect"),
    ]
    .into_iter()
    .map(|(head, tail, relation_type)| RawRelation {
        head: head.to_owned(),
        tail: tail.to_owned(),
        relation_type: relation_type.to_owned(),
    })
    .collect();

    KnowledgeBasePayload {
        entities,
        relations,
    }
}
