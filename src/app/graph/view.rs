use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2};

use crate::highlight::{
    BoundingBox, LinkCategory, NodeCategory, fit_camera, link_category, node_category,
};
use crate::layout::SimulationPhase;
use crate::route::{RouteEndpoint, route};
use crate::topology::{CLUSTERS, LinkKind, Node, NodeKind};

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, circle_visible, cluster_color, draw_background, fade_color, node_color,
    status_color, world_to_screen,
};
use super::super::ui::tooltip_text;

const DEVICE_RADIUS: f32 = 12.0;
const ARC_SEGMENTS: usize = 24;
const FADED_OPACITY: f32 = 0.12;

fn node_world_radius(node: &Node) -> f32 {
    match node.kind {
        NodeKind::ClusterAnchor(cluster) => cluster.cluster().display_radius,
        NodeKind::Device(_) | NodeKind::Unresolved => DEVICE_RADIUS,
    }
}

impl ViewModel {
    fn screen_space(&self, rect: Rect) -> (Vec<Pos2>, Vec<f32>) {
        let positions = self
            .engine
            .positions()
            .iter()
            .map(|&world| world_to_screen(rect, &self.camera, world))
            .collect();
        let radii = self
            .graph
            .nodes
            .iter()
            .map(|node| (node_world_radius(node) * self.camera.scale).max(3.0))
            .collect();
        (positions, radii)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let now = ui.input(|input| input.time);

        if !self.camera_ready {
            let canvas = self.engine.config().canvas_size();
            if let Some(bounds) = BoundingBox::from_points([egui::Vec2::ZERO, canvas]) {
                self.camera = fit_camera(bounds, rect.size());
            }
            self.camera_ready = true;
        }

        let camera_animating = self.advance_camera(now);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let (screen_positions, screen_radii) = self.screen_space(rect);
        let hovered = self.hovered_index(ui, rect, &screen_positions, &screen_radii);
        self.handle_node_drag(ui, rect, &response, &screen_positions, &screen_radii);
        self.apply_graph_click(&response, hovered);

        let frame_delta_seconds = ui.input(|input| input.stable_dt).clamp(0.0, 0.25);
        self.engine.tick(frame_delta_seconds);

        if self.fit_requested {
            self.start_selection_fit(rect, now);
        }

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.engine.dragging().is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        let (screen_positions, screen_radii) = self.screen_space(rect);
        draw_background(&painter, rect, &self.camera);
        self.draw_clusters(&painter, rect);
        self.draw_links(&painter, &screen_positions);
        self.draw_nodes(&painter, rect, &screen_positions, &screen_radii, hovered);

        if camera_animating
            || self.transition.is_some()
            || self.engine.phase() != SimulationPhase::Idle
        {
            ui.ctx().request_repaint();
        }

        if self.engine.dragging().is_none()
            && let Some(node) = hovered.and_then(|index| self.graph.nodes.get(index))
            && !node.is_anchor()
        {
            response.on_hover_text_at_pointer(tooltip_text(node));
        }
    }

    fn draw_clusters(&self, painter: &egui::Painter, rect: Rect) {
        for cluster in &CLUSTERS {
            if self.graph.anchor_index(cluster.id).is_none() {
                continue;
            }

            let anchor = self.engine.anchor_position(cluster.id);
            let center = world_to_screen(rect, &self.camera, anchor);
            let radius = cluster.radius * self.camera.scale;
            if !circle_visible(rect, center, radius) {
                continue;
            }

            let color = cluster_color(cluster.id);
            painter.circle(
                center,
                radius,
                fade_color(color, 0.05),
                Stroke::new(1.5, fade_color(color, 0.35)),
            );
            painter.text(
                center - vec2(0.0, radius + 8.0),
                Align2::CENTER_BOTTOM,
                format!("{} Cluster", cluster.label),
                FontId::proportional(14.0),
                fade_color(color, 0.8),
            );
        }
    }

    fn draw_links(&self, painter: &egui::Painter, screen_positions: &[Pos2]) {
        let zoom_sqrt = self.camera.scale.sqrt();

        for (link_index, link) in self.graph.links.iter().enumerate() {
            let (Some(&start), Some(&end)) = (
                screen_positions.get(link.source),
                screen_positions.get(link.target),
            ) else {
                continue;
            };

            let path = route(
                RouteEndpoint::for_node(&self.graph.nodes[link.source], start.to_vec2()),
                RouteEndpoint::for_node(&self.graph.nodes[link.target], end.to_vec2()),
            );

            let base_width = match link.kind {
                LinkKind::Membership => 1.0,
                LinkKind::DeviceToDevice => 1.6,
                LinkKind::InterCluster => 2.4,
            };
            let base_color = link
                .cluster
                .map(|cluster| fade_color(cluster_color(cluster), 0.55))
                .unwrap_or(Color32::from_rgba_unmultiplied(153, 153, 153, 150));
            let category = link_category(self.highlight.as_ref(), &self.graph, link_index);
            let (width, color) = match category {
                LinkCategory::Normal => (base_width, base_color),
                LinkCategory::Selected => (base_width + 1.6, Color32::from_rgb(251, 191, 36)),
                LinkCategory::Connected => (base_width + 0.8, Color32::from_rgb(96, 165, 250)),
                LinkCategory::Unrelated => (base_width, fade_color(base_color, FADED_OPACITY)),
            };
            let stroke = Stroke::new((width * zoom_sqrt).clamp(0.5, 5.0), color);

            let points = path
                .points(ARC_SEGMENTS)
                .into_iter()
                .map(|point| point.to_pos2())
                .collect::<Vec<_>>();
            painter.add(Shape::line(points, stroke));
        }
    }

    fn draw_nodes(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
        hovered: Option<usize>,
    ) {
        let selected_color = Color32::from_rgb(251, 191, 36);
        let connected_color = Color32::from_rgb(96, 165, 250);

        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = screen_positions[index];
            let radius = screen_radii[index];
            if !circle_visible(rect, position, radius + 24.0) {
                continue;
            }

            let category = node_category(self.highlight.as_ref(), index);
            let opacity = if category == NodeCategory::Unrelated {
                FADED_OPACITY
            } else {
                1.0
            };
            let is_hovered = hovered == Some(index);

            let base_color = node_color(node);
            let fill = match (&node.kind, is_hovered) {
                (NodeKind::ClusterAnchor(_), _) => fade_color(base_color, 0.85),
                (_, true) => blend_color(base_color, Color32::WHITE, 0.35),
                _ => base_color,
            };
            let outline = match category {
                NodeCategory::Selected => Stroke::new(3.0, selected_color),
                NodeCategory::Connected => Stroke::new(2.0, connected_color),
                NodeCategory::Normal | NodeCategory::Unrelated => Stroke::new(
                    1.0,
                    Color32::from_rgba_unmultiplied(15, 15, 15, 190),
                ),
            };

            painter.circle(
                position,
                radius,
                fade_color(fill, opacity),
                Stroke::new(outline.width, fade_color(outline.color, opacity)),
            );

            match &node.kind {
                NodeKind::ClusterAnchor(cluster) => {
                    painter.text(
                        position,
                        Align2::CENTER_CENTER,
                        cluster.cluster().label,
                        FontId::proportional((12.0 * self.camera.scale).clamp(8.0, 22.0)),
                        fade_color(Color32::from_gray(20), opacity),
                    );
                }
                NodeKind::Device(device) => {
                    let dot_radius = (3.0 * self.camera.scale).clamp(1.5, 5.0);
                    painter.circle_filled(
                        position + vec2(0.0, radius * 0.66),
                        dot_radius,
                        fade_color(status_color(device.status), opacity),
                    );
                }
                NodeKind::Unresolved => {
                    painter.text(
                        position,
                        Align2::CENTER_CENTER,
                        "?",
                        FontId::proportional(radius.clamp(8.0, 20.0)),
                        fade_color(Color32::WHITE, opacity),
                    );
                }
            }

            let show_label = !node.is_anchor()
                && (is_hovered
                    || matches!(category, NodeCategory::Selected | NodeCategory::Connected)
                    || self.camera.scale > 0.9);
            if show_label {
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    node.label(),
                    FontId::proportional(11.0),
                    fade_color(Color32::from_gray(229), opacity),
                );
            }
        }
    }
}
