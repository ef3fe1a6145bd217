use eframe::egui::{Vec2, vec2};

/// Tunables of the clustered force simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub tick_rate: f32,
    pub max_catch_up_steps: usize,

    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub settle_threshold: f32,
    pub drag_alpha_target: f32,
    pub velocity_decay: f32,

    pub anchor_link_distance: f32,
    pub anchor_device_link_distance: f32,
    pub device_link_distance: f32,

    pub anchor_charge: f32,
    pub device_charge: f32,
    pub barnes_hut_theta: f32,

    pub anchor_collision_radius: f32,
    pub device_collision_radius: f32,
    pub collision_strength: f32,

    pub cluster_pull: f32,
    pub unclassified_pull: f32,
    pub unresolved_pull: f32,
    /// Corner of the canvas, as fractions of its size, that collects unresolved
    /// and unclassified nodes.
    pub unresolved_corner: (f32, f32),
}

impl LayoutConfig {
    pub fn unresolved_anchor(&self) -> Vec2 {
        vec2(
            self.canvas_width * self.unresolved_corner.0,
            self.canvas_height * self.unresolved_corner.1,
        )
    }

    pub fn canvas_size(&self) -> Vec2 {
        vec2(self.canvas_width, self.canvas_height)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1600.0,
            canvas_height: 1200.0,
            tick_rate: 60.0,
            max_catch_up_steps: 4,

            alpha_min: 0.001,
            // Reaches alpha_min from 1.0 in 300 ticks.
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            settle_threshold: 0.05,
            drag_alpha_target: 0.3,
            velocity_decay: 0.4,

            anchor_link_distance: 400.0,
            anchor_device_link_distance: 200.0,
            device_link_distance: 120.0,

            anchor_charge: -1000.0,
            device_charge: -300.0,
            barnes_hut_theta: 0.9,

            anchor_collision_radius: 80.0,
            device_collision_radius: 40.0,
            collision_strength: 1.0,

            cluster_pull: 0.5,
            unclassified_pull: 0.5,
            unresolved_pull: 1.0,
            unresolved_corner: (0.95, 0.95),
        }
    }
}
