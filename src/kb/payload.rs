use serde::Deserialize;
use serde_json::{Map, Value};

/// Wire format of the knowledge-base endpoint: entity ids map to arbitrary
/// metadata (ignored beyond the key), relations are directed and typed.
/// `serde_json` is built with `preserve_order`, so iterating `entities`
/// follows the document order of the JSON object.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct KnowledgeBasePayload {
    #[serde(default)]
    pub entities: Map<String, Value>,
    #[serde(default)]
    pub relations: Vec<RawRelation>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawRelation {
    pub head: String,
    pub tail: String,
    #[serde(rename = "type")]
    pub relation_type: String,
}
