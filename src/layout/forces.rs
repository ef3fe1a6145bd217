use eframe::egui::{Vec2, vec2};

use super::Body;
use super::quadtree::QuadNode;

#[derive(Clone, Copy, Debug)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) distance: f32,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Pull {
    pub(super) target: Vec2,
    pub(super) strength: f32,
}

fn jiggle(seed: usize) -> f32 {
    (((seed as f32) * 0.618_034).fract() - 0.5) * 1e-6
}

fn nonzero(delta: Vec2, seed: usize) -> Vec2 {
    vec2(
        if delta.x == 0.0 { jiggle(seed) } else { delta.x },
        if delta.y == 0.0 { jiggle(seed + 1) } else { delta.y },
    )
}

pub(super) fn apply_links(bodies: &mut [Body], springs: &[Spring], alpha: f32) {
    for (index, spring) in springs.iter().enumerate() {
        let source = &bodies[spring.source];
        let target = &bodies[spring.target];
        let delta = nonzero(
            (target.position + target.velocity) - (source.position + source.velocity),
            index,
        );

        let length = delta.length();
        let scale = (length - spring.distance) / length * alpha * spring.strength;
        let correction = delta * scale;

        bodies[spring.target].velocity -= correction * spring.bias;
        bodies[spring.source].velocity += correction * (1.0 - spring.bias);
    }
}

fn repulsion_between(delta: Vec2, charge: f32, alpha: f32, seed: usize) -> Vec2 {
    let delta = nonzero(delta, seed);
    let mut distance_sq = delta.length_sq();
    if distance_sq < 1.0 {
        distance_sq = distance_sq.sqrt();
    }
    delta * (charge * alpha / distance_sq)
}

fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    theta: f32,
    alpha: f32,
    velocity: &mut Vec2,
) {
    if node.charge == 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            *velocity += repulsion_between(
                positions[other] - point,
                charges[other],
                alpha,
                index.wrapping_mul(31) ^ other,
            );
        }
        return;
    }

    let delta = node.center_of_charge - point;
    let distance = delta.length().max(0.0001);
    if !node.bounds.contains(point) && (node.bounds.side_length() / distance) < theta {
        *velocity += repulsion_between(delta, node.charge, alpha, index);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion_for_node(child, index, positions, charges, theta, alpha, velocity);
    }
}

pub(super) fn apply_repulsion(
    bodies: &mut [Body],
    charges: &[f32],
    theta: f32,
    alpha: f32,
    positions: &mut Vec<Vec2>,
) {
    positions.clear();
    positions.extend(bodies.iter().map(|body| body.position));

    let Some(tree) = QuadNode::build(positions, charges) else {
        return;
    };

    for (index, body) in bodies.iter_mut().enumerate() {
        accumulate_repulsion_for_node(
            &tree,
            index,
            positions,
            charges,
            theta,
            alpha,
            &mut body.velocity,
        );
    }
}

#[derive(Clone, Copy)]
struct CollisionParams {
    strength: f32,
    max_reach_sq: f32,
}

fn resolve_overlap(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let offset = positions[from] - positions[to];
    if offset.length_sq() >= reach * reach {
        return;
    }

    let offset = nonzero(offset, from.wrapping_mul(131) ^ to);
    let distance = offset.length();
    let push = offset * ((reach - distance) / distance * params.strength);

    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = to_sq / (from_sq + to_sq);
    deltas[from] += push * share;
    deltas[to] -= push * (1.0 - share);
}

fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > params.max_reach_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    resolve_overlap(from, to, positions, radii, params, deltas);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_overlap(from, to, positions, radii, params, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, positions, radii, params, deltas);
            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(child_a, child_b, false, positions, radii, params, deltas);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, positions, radii, params, deltas);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, positions, radii, params, deltas);
        }
    }
}

pub(super) fn apply_collisions(
    bodies: &mut [Body],
    radii: &[f32],
    strength: f32,
    positions: &mut Vec<Vec2>,
    deltas: &mut Vec<Vec2>,
) {
    positions.clear();
    positions.extend(bodies.iter().map(|body| body.position + body.velocity));
    deltas.clear();
    deltas.resize(bodies.len(), Vec2::ZERO);

    let max_radius = radii.iter().copied().fold(0.0_f32, f32::max);
    if max_radius <= 0.0 {
        return;
    }

    let Some(tree) = QuadNode::build(positions, radii) else {
        return;
    };

    let max_reach = max_radius * 2.0;
    accumulate_collision_pairs(
        &tree,
        &tree,
        true,
        positions,
        radii,
        CollisionParams {
            strength,
            max_reach_sq: max_reach * max_reach,
        },
        deltas,
    );

    for (body, delta) in bodies.iter_mut().zip(deltas.iter()) {
        body.velocity += *delta;
    }
}

pub(super) fn apply_pulls(bodies: &mut [Body], pulls: &[Option<Pull>], alpha: f32) {
    for (body, pull) in bodies.iter_mut().zip(pulls) {
        if let Some(pull) = pull {
            body.velocity += (pull.target - body.position) * (pull.strength * alpha);
        }
    }
}
