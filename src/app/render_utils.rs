use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::highlight::Camera;
use crate::topology::{ClusterId, DeviceStatus, Node, NodeKind};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn fade_color(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, camera: &Camera) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(17, 24, 39));

    let step = (80.0 * camera.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + camera.translate;

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(55, 65, 81, 60)),
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(55, 65, 81, 60)),
        );
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, camera: &Camera, world: Vec2) -> Pos2 {
    rect.min + camera.world_to_screen(world)
}

pub(super) fn screen_to_world(rect: Rect, camera: &Camera, screen: Pos2) -> Vec2 {
    camera.screen_to_world(screen - rect.min)
}

pub(super) fn cluster_color(cluster: ClusterId) -> Color32 {
    let [r, g, b] = cluster.cluster().color;
    Color32::from_rgb(r, g, b)
}

pub(super) fn node_color(node: &Node) -> Color32 {
    match &node.kind {
        NodeKind::ClusterAnchor(cluster) => cluster_color(*cluster),
        NodeKind::Device(device) => device
            .cluster
            .map(cluster_color)
            .unwrap_or(Color32::from_rgb(156, 163, 175)),
        NodeKind::Unresolved => Color32::from_rgb(239, 68, 68),
    }
}

pub(super) fn status_color(status: DeviceStatus) -> Color32 {
    match status {
        DeviceStatus::Active => Color32::from_rgb(76, 175, 80),
        DeviceStatus::Inactive => Color32::from_rgb(244, 67, 54),
    }
}
