use eframe::egui::{Vec2, vec2};

use crate::kb::KnowledgeGraph;
use crate::util::stable_pair;

use super::super::sim::{ForceSimulation, SimConfig};
use super::super::{GraphScene, GraphSession, SceneEdge, SceneNode};

impl GraphScene {
    /// One visual node per entity and one visual edge per relation, bound by
    /// index. Endpoints are resolved through the adapter-validated id map, so
    /// every edge survives the build.
    pub(in crate::app) fn new(graph: &KnowledgeGraph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|node| SceneNode {
                id: node.id.clone(),
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let source = graph.index_of(&edge.source)?;
                let target = graph.index_of(&edge.target)?;
                Some(SceneEdge {
                    source,
                    target,
                    label: edge.label.clone(),
                })
            })
            .collect();

        Self { nodes, edges }
    }

    pub(in crate::app) fn sim_edges(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect()
    }

    /// Deterministic phyllotaxis seeding with a per-id hash jitter, so two
    /// loads of the same knowledge base settle into the same layout.
    pub(in crate::app) fn seed_positions(&self) -> Vec<Vec2> {
        const SEED_RADIUS: f32 = 10.0;
        const SEED_ANGLE: f32 = std::f32::consts::PI * 0.381_966;

        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let radius = SEED_RADIUS * (0.5 + index as f32).sqrt();
                let angle = index as f32 * SEED_ANGLE;
                let (jx, jy) = stable_pair(&node.id);
                vec2(
                    angle.cos() * radius + jx,
                    angle.sin() * radius + jy,
                )
            })
            .collect()
    }
}

impl GraphSession {
    pub(in crate::app) fn new(label: String, graph: KnowledgeGraph) -> Self {
        let scene = GraphScene::new(&graph);
        let sim = ForceSimulation::new(
            scene.seed_positions(),
            &scene.sim_edges(),
            SimConfig::default(),
        );

        Self {
            label,
            graph,
            scene,
            sim,
            pan: Vec2::ZERO,
            zoom: 1.0,
            drag: None,
            search: String::new(),
            selected: None,
            screen_positions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::GraphSession;
    use crate::kb::adapt;

    fn dam_stream_session() -> GraphSession {
        let payload = serde_json::from_str(
            r#"{
                "entities": {"Dam": {}, "Stream": {}},
                "relations": [{"head": "Dam", "tail": "Stream", "type": "subclass of"}]
            }"#,
        )
        .expect("test payload parses");
        GraphSession::new("test".to_owned(), adapt(payload).expect("payload adapts"))
    }

    #[test]
    fn scene_binds_one_element_per_node_and_edge() {
        let session = dam_stream_session();

        assert_eq!(session.scene.nodes.len(), 2);
        assert_eq!(session.scene.nodes[0].id, "Dam");
        assert_eq!(session.scene.nodes[1].id, "Stream");

        assert_eq!(session.scene.edges.len(), 1);
        let edge = &session.scene.edges[0];
        assert_eq!(session.scene.nodes[edge.source].id, "Dam");
        assert_eq!(session.scene.nodes[edge.target].id, "Stream");
        assert_eq!(edge.label, "subclass of");
    }

    #[test]
    fn simulation_is_seeded_for_every_scene_node() {
        let session = dam_stream_session();
        assert_eq!(session.sim.nodes().len(), session.scene.nodes.len());
        assert!(session.sim.is_active());
    }

    #[test]
    fn seeding_is_deterministic_per_id() {
        let first = dam_stream_session();
        let second = dam_stream_session();
        for (a, b) in first.sim.nodes().iter().zip(second.sim.nodes()) {
            assert_eq!(a.pos, b.pos);
        }
    }
}
