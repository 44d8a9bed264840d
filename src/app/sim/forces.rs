use eframe::egui::{Vec2, vec2};

use super::SimNode;
use super::quadtree::QuadNode;

const MIN_DISTANCE_SQ: f32 = 1.0;

/// Deterministic tiny displacement for coincident points, in place of the
/// random jiggle d3 uses.
pub(super) fn jiggle(seed: usize) -> Vec2 {
    let angle = ((seed as f32) * 0.618_034 + 0.25) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1e-3
}

pub(super) struct SimLink {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) bias: f32,
    pub(super) strength: f32,
}

/// Spring toward `link_distance` per edge, with the correction split between
/// the endpoints by degree so well-connected nodes move less.
pub(super) fn accumulate_link_forces(
    nodes: &[SimNode],
    links: &[SimLink],
    link_distance: f32,
    alpha: f32,
    forces: &mut [Vec2],
) {
    for (index, link) in links.iter().enumerate() {
        let mut delta = nodes[link.target].pos - nodes[link.source].pos;
        if delta.length_sq() <= f32::EPSILON {
            delta = jiggle(index);
        }

        let length = delta.length();
        let magnitude = (length - link_distance) / length * alpha * link.strength;
        let correction = delta * magnitude;

        forces[link.target] -= correction * link.bias;
        forces[link.source] += correction * (1.0 - link.bias);
    }
}

fn charge_between(point: Vec2, other: Vec2, mass: f32, strength: f32, alpha: f32, seed: usize) -> Vec2 {
    let mut delta = point - other;
    if delta.length_sq() <= f32::EPSILON {
        delta = jiggle(seed);
    }

    let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
    // negative strength repels, matching the -200 charge convention
    delta * (-strength * mass * alpha / distance_sq)
}

pub(super) fn accumulate_charge_exact(
    positions: &[Vec2],
    strength: f32,
    alpha: f32,
    forces: &mut [Vec2],
) {
    for index in 0..positions.len() {
        for other in 0..positions.len() {
            if other == index {
                continue;
            }
            forces[index] += charge_between(
                positions[index],
                positions[other],
                1.0,
                strength,
                alpha,
                index ^ other,
            );
        }
    }
}

/// Barnes-Hut pass: distant cells contribute through their center of mass.
pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    alpha: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            *force += charge_between(point, positions[other], 1.0, strength, alpha, index ^ other);
        }
        return;
    }

    let delta = point - node.center_of_mass;
    let distance = delta.length_sq().max(MIN_DISTANCE_SQ).sqrt();
    let can_approximate =
        !node.bounds.contains(point) && ((node.bounds.side_length() / distance) < theta);

    if can_approximate {
        *force += charge_between(point, node.center_of_mass, node.mass, strength, alpha, index);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, strength, alpha, theta, force);
    }
}

/// Rigid recentering: translate the whole set so its centroid lands on
/// `center`. Pinned nodes are restored afterwards by the integrator.
pub(super) fn apply_centering(nodes: &mut [SimNode], center: Vec2) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.pos;
    }
    centroid /= nodes.len() as f32;

    let shift = centroid - center;
    if shift.length_sq() <= f32::EPSILON {
        return;
    }

    for node in nodes.iter_mut() {
        node.pos -= shift;
    }
}
