mod config;
mod containment;
mod forces;
mod quadtree;
mod scheduler;

use eframe::egui::{Vec2, vec2};

use crate::topology::{ClusterId, NodeKind, TopologyGraph};
use crate::util::stable_pair;

pub use config::LayoutConfig;
use containment::clamp_to_circle;
use forces::{Pull, Spring, apply_collisions, apply_links, apply_pulls, apply_repulsion};
use scheduler::FixedStepScheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    Idle,
    Running,
    Settling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BodyRole {
    Anchor(ClusterId),
    Member(ClusterId),
    Unclassified,
    Unresolved,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Body {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) pin: Option<Vec2>,
}

#[derive(Default)]
struct ForceScratch {
    positions: Vec<Vec2>,
    deltas: Vec<Vec2>,
}

/// Clustered force simulation over one topology graph.
///
/// Bodies are indexed like `TopologyGraph::nodes`. The engine never holds on
/// to the graph itself; a new document means a new engine.
pub struct LayoutEngine {
    config: LayoutConfig,
    bodies: Vec<Body>,
    roles: Vec<BodyRole>,
    anchors: [Option<usize>; 3],
    springs: Vec<Spring>,
    charges: Vec<f32>,
    radii: Vec<f32>,
    pulls: Vec<Option<Pull>>,
    positions: Vec<Vec2>,
    alpha: f32,
    alpha_target: f32,
    phase: SimulationPhase,
    dragging: Option<usize>,
    scheduler: FixedStepScheduler,
    scratch: ForceScratch,
    ticks: u64,
}

impl LayoutEngine {
    pub fn new(graph: &TopologyGraph, config: LayoutConfig) -> Self {
        let roles = graph
            .nodes
            .iter()
            .map(|node| match &node.kind {
                NodeKind::ClusterAnchor(cluster) => BodyRole::Anchor(*cluster),
                NodeKind::Device(device) => device
                    .cluster
                    .map_or(BodyRole::Unclassified, BodyRole::Member),
                NodeKind::Unresolved => BodyRole::Unresolved,
            })
            .collect::<Vec<_>>();

        let anchors = ClusterId::ALL.map(|cluster| graph.anchor_index(cluster));

        let bodies = graph
            .nodes
            .iter()
            .zip(&roles)
            .map(|(node, role)| Self::initial_body(&node.id, *role, &config))
            .collect::<Vec<_>>();

        let springs = graph
            .links
            .iter()
            .map(|link| {
                let source_degree = graph.degree(link.source).max(1) as f32;
                let target_degree = graph.degree(link.target).max(1) as f32;
                let distance = match (
                    matches!(roles[link.source], BodyRole::Anchor(_)),
                    matches!(roles[link.target], BodyRole::Anchor(_)),
                ) {
                    (true, true) => config.anchor_link_distance,
                    (true, false) | (false, true) => config.anchor_device_link_distance,
                    (false, false) => config.device_link_distance,
                };

                Spring {
                    source: link.source,
                    target: link.target,
                    distance,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        let charges = roles
            .iter()
            .map(|role| match role {
                BodyRole::Anchor(_) => config.anchor_charge,
                _ => config.device_charge,
            })
            .collect();

        let radii = roles
            .iter()
            .map(|role| match role {
                BodyRole::Anchor(_) => config.anchor_collision_radius,
                _ => config.device_collision_radius,
            })
            .collect();

        let pulls = roles
            .iter()
            .map(|role| match role {
                BodyRole::Anchor(_) => None,
                BodyRole::Member(cluster) => Some(Pull {
                    target: cluster.cluster().anchor_pos(),
                    strength: config.cluster_pull,
                }),
                BodyRole::Unclassified => Some(Pull {
                    target: config.unresolved_anchor(),
                    strength: config.unclassified_pull,
                }),
                BodyRole::Unresolved => Some(Pull {
                    target: config.unresolved_anchor(),
                    strength: config.unresolved_pull,
                }),
            })
            .collect();

        let positions = bodies.iter().map(|body: &Body| body.position).collect();

        let mut engine = Self {
            config,
            bodies,
            roles,
            anchors,
            springs,
            charges,
            radii,
            pulls,
            positions,
            alpha: 1.0,
            alpha_target: 0.0,
            phase: SimulationPhase::Idle,
            dragging: None,
            scheduler: FixedStepScheduler::new(config.tick_rate, config.max_catch_up_steps),
            scratch: ForceScratch::default(),
            ticks: 0,
        };
        engine.refresh_pulls();
        engine.contain();
        engine.sync_positions();
        engine
    }

    fn initial_body(id: &str, role: BodyRole, config: &LayoutConfig) -> Body {
        let (jx, jy) = stable_pair(id);
        let jitter = vec2(jx, jy);

        match role {
            BodyRole::Anchor(cluster) => {
                let anchor = cluster.cluster().anchor_pos();
                Body {
                    position: anchor,
                    velocity: Vec2::ZERO,
                    pin: Some(anchor),
                }
            }
            BodyRole::Member(cluster) => {
                let cluster = cluster.cluster();
                Body {
                    position: cluster.anchor_pos() + jitter * (cluster.containment_radius() * 0.6),
                    velocity: Vec2::ZERO,
                    pin: None,
                }
            }
            BodyRole::Unclassified | BodyRole::Unresolved => Body {
                position: config.unresolved_anchor() + jitter * 60.0,
                velocity: Vec2::ZERO,
                pin: None,
            },
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.bodies.get(index).is_some_and(|body| body.pin.is_some())
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    /// Live anchor coordinate of a cluster. Anchors can be dragged, so this may
    /// differ from the registry coordinate.
    pub fn anchor_position(&self, cluster: ClusterId) -> Vec2 {
        self.anchors[cluster.index()]
            .and_then(|index| self.positions.get(index).copied())
            .unwrap_or_else(|| cluster.cluster().anchor_pos())
    }

    pub fn start(&mut self) {
        if self.bodies.is_empty() {
            return;
        }

        self.alpha = 1.0;
        self.phase = SimulationPhase::Running;
        self.scheduler.reset();
        log::debug!("layout started with {} bodies", self.bodies.len());
    }

    /// Halts the simulation synchronously; later `tick` calls are no-ops until
    /// the engine is restarted.
    pub fn stop(&mut self) {
        if self.phase != SimulationPhase::Idle {
            log::debug!("layout stopped after {} ticks", self.ticks);
        }
        self.phase = SimulationPhase::Idle;
        self.scheduler.reset();
    }

    /// Advances the simulation by `dt` seconds of wall time and returns the
    /// positions after the owed ticks.
    pub fn tick(&mut self, dt: f32) -> &[Vec2] {
        if self.phase == SimulationPhase::Idle {
            return &self.positions;
        }

        let mut steps = self.scheduler.advance(dt);
        if steps == 0 && self.dragging.is_some() {
            steps = 1;
        }

        for _ in 0..steps {
            self.step();
            if self.phase == SimulationPhase::Idle {
                break;
            }
        }

        &self.positions
    }

    /// Runs exactly one simulation tick, whatever the scheduler says.
    pub fn step(&mut self) {
        if self.phase == SimulationPhase::Idle {
            return;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.refresh_pulls();

        let alpha = self.alpha;
        apply_links(&mut self.bodies, &self.springs, alpha);
        apply_repulsion(
            &mut self.bodies,
            &self.charges,
            self.config.barnes_hut_theta,
            alpha,
            &mut self.scratch.positions,
        );
        apply_collisions(
            &mut self.bodies,
            &self.radii,
            self.config.collision_strength,
            &mut self.scratch.positions,
            &mut self.scratch.deltas,
        );
        apply_pulls(&mut self.bodies, &self.pulls, alpha);

        let retain = 1.0 - self.config.velocity_decay;
        for body in &mut self.bodies {
            if let Some(pin) = body.pin {
                body.position = pin;
                body.velocity = Vec2::ZERO;
            } else {
                body.velocity *= retain;
                body.position += body.velocity;
            }
        }

        self.contain();
        self.sync_positions();
        self.ticks += 1;
        self.update_phase();
    }

    fn update_phase(&mut self) {
        let boosted = self.alpha >= self.config.settle_threshold;
        self.phase = match self.phase {
            SimulationPhase::Idle => SimulationPhase::Idle,
            SimulationPhase::Running if boosted => SimulationPhase::Running,
            SimulationPhase::Running => SimulationPhase::Settling,
            SimulationPhase::Settling if boosted => SimulationPhase::Running,
            SimulationPhase::Settling
                if self.alpha < self.config.alpha_min
                    && self.alpha_target < self.config.alpha_min =>
            {
                log::debug!("layout settled after {} ticks", self.ticks);
                SimulationPhase::Idle
            }
            SimulationPhase::Settling => SimulationPhase::Settling,
        };
    }

    fn refresh_pulls(&mut self) {
        for (index, role) in self.roles.iter().enumerate() {
            if let BodyRole::Member(cluster) = role
                && let Some(pull) = self.pulls[index].as_mut()
            {
                pull.target = self.anchors[cluster.index()]
                    .map(|anchor| self.bodies[anchor].position)
                    .unwrap_or_else(|| cluster.cluster().anchor_pos());
            }
        }
    }

    fn contain(&mut self) {
        for index in 0..self.bodies.len() {
            self.contain_body(index);
        }
    }

    fn contain_body(&mut self, index: usize) {
        let BodyRole::Member(cluster) = self.roles[index] else {
            return;
        };

        let center = self.anchors[cluster.index()]
            .map(|anchor| self.bodies[anchor].position)
            .unwrap_or_else(|| cluster.cluster().anchor_pos());
        let radius = cluster.cluster().containment_radius();
        clamp_to_circle(&mut self.bodies[index].position, center, radius);
    }

    fn sync_positions(&mut self) {
        self.positions.clear();
        self.positions
            .extend(self.bodies.iter().map(|body| body.position));
    }

    /// Pins the node where it is and reheats the simulation.
    pub fn drag_start(&mut self, index: usize) -> bool {
        let Some(body) = self.bodies.get_mut(index) else {
            return false;
        };

        body.pin = Some(body.position);
        self.dragging = Some(index);
        self.alpha_target = self.config.drag_alpha_target;
        self.alpha = self.alpha.max(self.config.settle_threshold);
        if self.phase != SimulationPhase::Running {
            self.phase = SimulationPhase::Running;
            self.scheduler.reset();
        }
        true
    }

    /// Moves the pin, and the body with it, to `world`.
    pub fn drag_move(&mut self, index: usize, world: Vec2) {
        if self.dragging != Some(index) {
            return;
        }
        let Some(body) = self.bodies.get_mut(index) else {
            return;
        };

        body.pin = Some(world);
        body.position = world;
        body.velocity = Vec2::ZERO;

        if matches!(self.roles[index], BodyRole::Anchor(_)) {
            self.refresh_pulls();
            self.contain();
        } else {
            self.contain_body(index);
        }
        self.sync_positions();
    }

    /// Ends the drag. Anchors keep their pin wherever they were dropped.
    pub fn drag_end(&mut self, index: usize) {
        if self.dragging != Some(index) {
            return;
        }

        self.dragging = None;
        self.alpha_target = 0.0;
        if !matches!(self.roles.get(index), Some(BodyRole::Anchor(_)))
            && let Some(body) = self.bodies.get_mut(index)
        {
            body.pin = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use super::*;
    use crate::topology::{CLUSTERS, build_topology};

    fn graph_from(document: Value) -> TopologyGraph {
        let (graph, error) = build_topology(Some(&document));
        assert!(error.is_none());
        graph
    }

    fn sample_graph() -> TopologyGraph {
        graph_from(json!([{ "mac_data": [
            { "IT Workstations": [
                { "MAC": "it-1", "Vendor": "Dell", "status": "true", "it-1": ["net-1"] },
                { "MAC": "it-2", "Vendor": "HP", "status": "false", "it-2": ["00:00:00:00:00:00"] },
            ] },
            { "Network Switches": [
                { "MAC": "net-1", "Vendor": "Router Inc", "status": "true", "net-1": ["ot-1", "ghost"] },
            ] },
            { "OT PLCs": [
                { "MAC": "ot-1", "Vendor": "Siemens", "status": "true" },
            ] },
            { "Cloud Hosts": [
                { "MAC": "cloud-1", "Vendor": "Amazon", "status": "true" },
            ] },
        ] }]))
    }

    fn distance_violations(engine: &LayoutEngine, graph: &TopologyGraph) -> Vec<(String, f32)> {
        graph
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let device = node.device()?;
                let cluster = device.cluster?;
                let distance = (engine.positions()[index] - engine.anchor_position(cluster)).length();
                (distance > cluster.cluster().containment_radius() + 1e-3)
                    .then(|| (node.id.clone(), distance))
            })
            .collect()
    }

    #[test]
    fn new_engine_is_idle_with_pinned_anchors() {
        let graph = sample_graph();
        let engine = LayoutEngine::new(&graph, LayoutConfig::default());

        assert_eq!(engine.phase(), SimulationPhase::Idle);
        assert_eq!(engine.positions().len(), graph.node_count());
        for cluster in &CLUSTERS {
            let index = graph.anchor_index(cluster.id).unwrap();
            assert!(engine.is_pinned(index));
            assert_eq!(engine.positions()[index], cluster.anchor_pos());
        }
    }

    #[test]
    fn idle_engine_does_not_move() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        let before = engine.positions().to_vec();
        engine.tick(1.0);
        assert_eq!(engine.positions(), before.as_slice());
        assert_eq!(engine.ticks(), 0);
    }

    #[test]
    fn runs_settles_and_goes_idle() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        engine.start();
        assert_eq!(engine.phase(), SimulationPhase::Running);

        let mut seen_settling = false;
        for _ in 0..1000 {
            engine.step();
            if engine.phase() == SimulationPhase::Settling {
                seen_settling = true;
            }
            if engine.phase() == SimulationPhase::Idle {
                break;
            }
        }

        assert!(seen_settling);
        assert_eq!(engine.phase(), SimulationPhase::Idle);
        assert!(engine.alpha() < engine.config().alpha_min);
        assert!(engine.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn members_stay_inside_their_cluster() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        engine.start();
        for _ in 0..200 {
            engine.step();
            assert!(distance_violations(&engine, &graph).is_empty());
        }
    }

    #[test]
    fn unresolved_nodes_drift_to_the_corner() {
        let graph = sample_graph();
        let config = LayoutConfig::default();
        let mut engine = LayoutEngine::new(&graph, config);
        engine.start();
        for _ in 0..300 {
            engine.step();
        }

        let ghost = graph.index_of("ghost").unwrap();
        let corner = config.unresolved_anchor();
        let it_anchor = ClusterId::It.cluster().anchor_pos();
        let position = engine.positions()[ghost];
        assert!((position - corner).length() < (position - it_anchor).length());
    }

    #[test]
    fn drag_pins_then_releases_devices() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        let device = graph.index_of("it-1").unwrap();
        let anchor = graph.anchor_index(ClusterId::It).unwrap();
        let target = ClusterId::It.cluster().anchor_pos() + vec2(50.0, -40.0);

        assert!(engine.drag_start(device));
        assert_eq!(engine.phase(), SimulationPhase::Running);
        assert!(engine.is_pinned(device));

        engine.drag_move(device, target);
        assert_eq!(engine.positions()[device], target);
        engine.step();
        assert_eq!(engine.positions()[device], target);

        engine.drag_end(device);
        assert!(!engine.is_pinned(device));
        assert!(engine.is_pinned(anchor));
        assert_eq!(engine.dragging(), None);
    }

    #[test]
    fn dragging_outside_the_cluster_is_contained() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        let device = graph.index_of("it-2").unwrap();

        engine.drag_start(device);
        engine.drag_move(device, vec2(1500.0, 1100.0));
        assert!(distance_violations(&engine, &graph).is_empty());
        engine.step();
        assert!(distance_violations(&engine, &graph).is_empty());
    }

    #[test]
    fn dropped_anchor_stays_pinned_and_carries_members() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        let anchor = graph.anchor_index(ClusterId::Ot).unwrap();
        let dropped = vec2(800.0, 700.0);

        engine.drag_start(anchor);
        engine.drag_move(anchor, dropped);
        engine.drag_end(anchor);
        for _ in 0..50 {
            engine.step();
        }

        assert!(engine.is_pinned(anchor));
        assert_eq!(engine.positions()[anchor], dropped);
        assert_eq!(engine.anchor_position(ClusterId::Ot), dropped);
        assert!(distance_violations(&engine, &graph).is_empty());
    }

    #[test]
    fn drag_reheats_a_settled_engine() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        let device = graph.index_of("net-1").unwrap();

        engine.drag_start(device);
        for _ in 0..100 {
            engine.step();
        }
        assert_eq!(engine.phase(), SimulationPhase::Running);
        assert!(engine.alpha() > engine.config().settle_threshold);

        engine.drag_end(device);
        for _ in 0..2000 {
            engine.step();
        }
        assert_eq!(engine.phase(), SimulationPhase::Idle);
    }

    #[test]
    fn tick_runs_at_least_once_while_dragging() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        let device = graph.index_of("it-1").unwrap();
        engine.drag_start(device);

        let before = engine.ticks();
        engine.tick(0.0001);
        assert_eq!(engine.ticks(), before + 1);
    }

    #[test]
    fn stop_halts_ticks() {
        let graph = sample_graph();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        engine.start();
        engine.tick(0.05);
        let ticks = engine.ticks();
        engine.stop();
        engine.tick(1.0);
        assert_eq!(engine.ticks(), ticks);
        assert_eq!(engine.phase(), SimulationPhase::Idle);
    }

    #[test]
    fn empty_graph_never_starts() {
        let graph = TopologyGraph::default();
        let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
        engine.start();
        assert_eq!(engine.phase(), SimulationPhase::Idle);
        assert!(engine.tick(1.0).is_empty());
        assert!(!engine.drag_start(0));
    }

    #[test]
    fn link_distance_depends_on_endpoint_kinds() {
        let graph = sample_graph();
        let engine = LayoutEngine::new(&graph, LayoutConfig::default());
        for (spring, link) in engine.springs.iter().zip(&graph.links) {
            let anchors = [link.source, link.target]
                .iter()
                .filter(|&&index| graph.nodes[index].is_anchor())
                .count();
            let expected = match anchors {
                2 => 400.0,
                1 => 200.0,
                _ => 120.0,
            };
            assert_eq!(spring.distance, expected);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn containment_holds_for_crowded_clusters(
            counts in prop::array::uniform3(0usize..25),
            steps in 1usize..80,
        ) {
            let mut categories = Vec::new();
            for (cluster, count) in ClusterId::ALL.iter().zip(counts) {
                let label = cluster.cluster().label;
                let devices = (0..count)
                    .map(|index| {
                        let mac = format!("{label}-{index}");
                        let peer = format!("{label}-{}", (index + 1) % count.max(1));
                        json!({ "MAC": mac.clone(), "status": "true", mac: [peer] })
                    })
                    .collect::<Vec<_>>();
                categories.push(json!({ label: devices }));
            }
            let graph = graph_from(json!([{ "mac_data": categories }]));

            let mut engine = LayoutEngine::new(&graph, LayoutConfig::default());
            engine.start();
            for _ in 0..steps {
                engine.step();
            }
            prop_assert!(distance_violations(&engine, &graph).is_empty());
        }
    }
}
