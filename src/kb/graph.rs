use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityNode {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Node and edge sets for exactly one knowledge base. Immutable once built:
/// every edge endpoint is guaranteed by the adapter to resolve through
/// `index_of`, and node ids are unique.
#[derive(Clone, Debug)]
pub struct KnowledgeGraph {
    pub nodes: Vec<EntityNode>,
    pub edges: Vec<RelationEdge>,
    index_by_id: HashMap<String, usize>,
}

impl KnowledgeGraph {
    pub(super) fn new(
        nodes: Vec<EntityNode>,
        edges: Vec<RelationEdge>,
        index_by_id: HashMap<String, usize>,
    ) -> Self {
        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Relations touching `id`, in payload order. Drives the details panel.
    pub fn relations_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a RelationEdge> {
        self.edges
            .iter()
            .filter(move |edge| edge.source == id || edge.target == id)
    }
}
