mod adapt;
mod demo;
mod fetch;
mod graph;
mod payload;

pub use adapt::{MalformedGraphError, adapt};
pub use demo::{DEMO_NAME, demo_payload};
pub use fetch::{KbSelector, fetch_knowledge_base, knowledge_base_url};
pub use graph::{EntityNode, KnowledgeGraph, RelationEdge};
pub use payload::{KnowledgeBasePayload, RawRelation};
