mod forces;
mod quadtree;

use eframe::egui::Vec2;

use forces::{
    SimLink, accumulate_charge_exact, accumulate_charge_for_node, accumulate_link_forces,
    apply_centering,
};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.81;
const BARNES_HUT_MIN_NODES: usize = 48;
const ALPHA_DECAY_TICKS: f32 = 300.0;

/// Alpha target used while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f32 = 0.3;

#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    pub link_distance: f32,
    pub charge_strength: f32,
    pub center: Vec2,
    pub alpha_min: f32,
    pub velocity_decay: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            link_distance: 30.0,
            charge_strength: -200.0,
            center: Vec2::ZERO,
            alpha_min: 0.001,
            velocity_decay: 0.6,
        }
    }
}

pub struct SimNode {
    pub pos: Vec2,
    pub vel: Vec2,
    /// User-imposed fixed position. While set, ticks report exactly this
    /// position and the node takes no displacement from the forces.
    pub pin: Option<Vec2>,
}

struct SimScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
}

/// Iterative force layout: each tick advances the decaying alpha, pulls
/// linked nodes toward a rest separation, repels all node pairs, recenters
/// the set, then integrates velocities. Ticking goes idle once alpha falls
/// under `alpha_min`; `reheat` resumes it.
pub struct ForceSimulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    config: SimConfig,
    alpha: f32,
    alpha_decay: f32,
    alpha_target: f32,
    scratch: SimScratch,
}

impl ForceSimulation {
    pub fn new(seed_positions: Vec<Vec2>, edges: &[(usize, usize)], config: SimConfig) -> Self {
        let node_count = seed_positions.len();

        let mut degree = vec![0usize; node_count];
        for &(source, target) in edges {
            if source < node_count && target < node_count {
                degree[source] += 1;
                degree[target] += 1;
            }
        }

        let links = edges
            .iter()
            .filter(|&&(source, target)| source < node_count && target < node_count)
            .map(|&(source, target)| {
                let source_degree = degree[source].max(1) as f32;
                let target_degree = degree[target].max(1) as f32;
                SimLink {
                    source,
                    target,
                    bias: source_degree / (source_degree + target_degree),
                    strength: 1.0 / source_degree.min(target_degree),
                }
            })
            .collect();

        let nodes = seed_positions
            .into_iter()
            .map(|pos| SimNode {
                pos,
                vel: Vec2::ZERO,
                pin: None,
            })
            .collect();

        Self {
            nodes,
            links,
            alpha: 1.0,
            alpha_decay: 1.0 - config.alpha_min.powf(1.0 / ALPHA_DECAY_TICKS),
            alpha_target: 0.0,
            config,
            scratch: SimScratch {
                forces: Vec::new(),
                positions: Vec::new(),
            },
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn is_active(&self) -> bool {
        self.alpha >= self.config.alpha_min || self.alpha_target >= self.config.alpha_min
    }

    /// Raise the alpha target so ticking resumes (drag start uses
    /// `DRAG_ALPHA_TARGET`).
    pub fn reheat(&mut self, target: f32) {
        self.alpha_target = target;
        if self.alpha < target {
            self.alpha = target;
        }
    }

    /// Let alpha resume its normal decay toward rest.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn set_pin(&mut self, index: usize, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(pos);
        }
    }

    pub fn clear_pin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// One simulation step. Returns false without touching anything once the
    /// simulation has gone idle.
    pub fn tick(&mut self) -> bool {
        if !self.is_active() || self.nodes.is_empty() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        let node_count = self.nodes.len();
        let scratch = &mut self.scratch;
        scratch.forces.resize(node_count, Vec2::ZERO);
        scratch.forces.fill(Vec2::ZERO);

        accumulate_link_forces(
            &self.nodes,
            &self.links,
            self.config.link_distance,
            self.alpha,
            &mut scratch.forces,
        );

        scratch.positions.clear();
        scratch.positions.extend(self.nodes.iter().map(|node| node.pos));
        if node_count >= BARNES_HUT_MIN_NODES {
            if let Some(root) = QuadNode::build(&scratch.positions) {
                for (index, force) in scratch.forces.iter_mut().enumerate() {
                    accumulate_charge_for_node(
                        &root,
                        index,
                        &scratch.positions,
                        self.config.charge_strength,
                        self.alpha,
                        BARNES_HUT_THETA,
                        force,
                    );
                }
            }
        } else {
            accumulate_charge_exact(
                &scratch.positions,
                self.config.charge_strength,
                self.alpha,
                &mut scratch.forces,
            );
        }

        apply_centering(&mut self.nodes, self.config.center);

        for (node, force) in self.nodes.iter_mut().zip(scratch.forces.iter()) {
            if let Some(pin) = node.pin {
                node.pos = pin;
                node.vel = Vec2::ZERO;
            } else {
                node.vel = (node.vel + *force) * self.config.velocity_decay;
                node.pos += node.vel;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, vec2};

    use super::{DRAG_ALPHA_TARGET, ForceSimulation, SimConfig};

    fn sim_with(positions: Vec<Vec2>, edges: &[(usize, usize)]) -> ForceSimulation {
        ForceSimulation::new(positions, edges, SimConfig::default())
    }

    fn run_to_idle(sim: &mut ForceSimulation) -> usize {
        let mut ticks = 0;
        while sim.tick() {
            ticks += 1;
            assert!(ticks < 2000, "simulation never went idle");
        }
        ticks
    }

    #[test]
    fn pinned_node_never_moves_while_pinned() {
        let mut sim = sim_with(
            vec![vec2(0.0, 0.0), vec2(50.0, 0.0), vec2(-40.0, 30.0)],
            &[(0, 1), (1, 2)],
        );
        let pin = vec2(120.0, -45.0);
        sim.set_pin(1, pin);

        for _ in 0..50 {
            sim.tick();
            assert_eq!(sim.nodes()[1].pos, pin);
        }
    }

    #[test]
    fn cleared_pin_returns_the_node_to_free_simulation() {
        let mut sim = sim_with(vec![vec2(0.0, 0.0), vec2(50.0, 0.0)], &[(0, 1)]);
        let pin = vec2(200.0, 0.0);
        sim.set_pin(1, pin);
        for _ in 0..10 {
            sim.tick();
        }
        assert_eq!(sim.nodes()[1].pos, pin);

        sim.clear_pin(1);
        sim.reheat(DRAG_ALPHA_TARGET);
        for _ in 0..10 {
            sim.tick();
        }
        assert_ne!(sim.nodes()[1].pos, pin);
    }

    #[test]
    fn alpha_decays_until_the_loop_goes_idle() {
        let mut sim = sim_with(vec![vec2(0.0, 0.0), vec2(60.0, 10.0)], &[(0, 1)]);
        let ticks = run_to_idle(&mut sim);

        assert!(ticks > 100);
        assert!(!sim.is_active());
        assert!(sim.alpha() < 0.001);

        let resting = sim.nodes()[0].pos;
        assert!(!sim.tick());
        assert_eq!(sim.nodes()[0].pos, resting);
    }

    #[test]
    fn reheat_restarts_an_idle_simulation() {
        let mut sim = sim_with(vec![vec2(0.0, 0.0), vec2(60.0, 10.0)], &[(0, 1)]);
        run_to_idle(&mut sim);

        sim.reheat(DRAG_ALPHA_TARGET);
        assert!(sim.is_active());
        assert!(sim.tick());

        for _ in 0..200 {
            sim.tick();
        }
        assert!((sim.alpha() - DRAG_ALPHA_TARGET).abs() < 0.05);

        sim.cool();
        run_to_idle(&mut sim);
        assert!(!sim.is_active());
    }

    #[test]
    fn linked_nodes_pull_together() {
        let mut sim = sim_with(vec![vec2(-200.0, 0.0), vec2(200.0, 0.0)], &[(0, 1)]);
        let before = (sim.nodes()[0].pos - sim.nodes()[1].pos).length();
        for _ in 0..100 {
            sim.tick();
        }
        let after = (sim.nodes()[0].pos - sim.nodes()[1].pos).length();
        assert!(after < before, "expected {after} < {before}");
    }

    #[test]
    fn unlinked_nodes_repel() {
        let mut sim = sim_with(vec![vec2(-3.0, 0.0), vec2(3.0, 0.0)], &[]);
        let before = (sim.nodes()[0].pos - sim.nodes()[1].pos).length();
        for _ in 0..50 {
            sim.tick();
        }
        let after = (sim.nodes()[0].pos - sim.nodes()[1].pos).length();
        assert!(after > before, "expected {after} > {before}");
    }

    #[test]
    fn centroid_tracks_the_configured_center() {
        let config = SimConfig {
            center: vec2(350.0, 350.0),
            ..SimConfig::default()
        };
        let mut sim = ForceSimulation::new(
            vec![vec2(0.0, 0.0), vec2(40.0, 0.0), vec2(20.0, 35.0)],
            &[],
            config,
        );

        for _ in 0..5 {
            sim.tick();
        }

        let centroid = sim
            .nodes()
            .iter()
            .fold(Vec2::ZERO, |sum, node| sum + node.pos)
            / sim.nodes().len() as f32;
        assert!((centroid - vec2(350.0, 350.0)).length() < 0.05);
    }

    #[test]
    fn large_graphs_stay_finite_through_the_approximate_pass() {
        let positions = (0..120)
            .map(|index| {
                let angle = index as f32 * 0.618_034 * std::f32::consts::TAU;
                vec2(angle.cos(), angle.sin()) * (20.0 + index as f32)
            })
            .collect::<Vec<_>>();
        let edges = (1..120).map(|index| (index - 1, index)).collect::<Vec<_>>();

        let mut sim = sim_with(positions, &edges);
        for _ in 0..20 {
            sim.tick();
        }

        for node in sim.nodes() {
            assert!(node.pos.x.is_finite() && node.pos.y.is_finite());
        }
    }
}
