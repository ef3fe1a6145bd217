use eframe::egui::{self, Pos2, Rect, Ui};

use crate::highlight::{
    BoundingBox, CameraTransition, HighlightState, NodeCategory, fit_camera, node_category,
};

use super::super::ViewModel;
use super::super::render_utils::{circle_visible, screen_to_world};

fn node_at(
    highlight: Option<&HighlightState>,
    rect: Rect,
    screen_positions: &[Pos2],
    screen_radii: &[f32],
    pointer: Pos2,
) -> Option<usize> {
    if !rect.contains(pointer) {
        return None;
    }

    screen_positions
        .iter()
        .zip(screen_radii)
        .enumerate()
        .filter(|&(index, _)| node_category(highlight, index) != NodeCategory::Unrelated)
        .filter(|&(_, (&position, &radius))| circle_visible(rect, position, radius))
        .filter_map(|(index, (position, &radius))| {
            let distance = position.distance(pointer);
            (distance <= radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.transition = None;
        self.camera.zoom_about(pointer - rect.min, zoom_factor);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.transition = None;
            self.camera.pan_by(response.drag_delta());
        }
    }

    pub(in crate::app) fn hovered_index(
        &self,
        ui: &Ui,
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        node_at(
            self.highlight.as_ref(),
            rect,
            screen_positions,
            screen_radii,
            pointer,
        )
    }

    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(origin) = ui.input(|input| input.pointer.press_origin())
            && let Some(index) = node_at(
                self.highlight.as_ref(),
                rect,
                screen_positions,
                screen_radii,
                origin,
            )
        {
            self.engine.drag_start(index);
        }

        let Some(index) = self.engine.dragging() else {
            return;
        };

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = ui.input(|input| input.pointer.interact_pos())
        {
            let world = screen_to_world(rect, &self.camera, pointer);
            self.engine.drag_move(index, world);
        }

        if response.drag_stopped() || !ui.input(|input| input.pointer.primary_down()) {
            self.engine.drag_end(index);
        }
    }

    pub(in crate::app) fn apply_graph_click(
        &mut self,
        response: &egui::Response,
        hovered: Option<usize>,
    ) {
        if response.clicked_by(egui::PointerButton::Primary) {
            self.set_selected(hovered);
        }
    }

    pub(in crate::app) fn start_selection_fit(&mut self, rect: Rect, now: f64) {
        self.fit_requested = false;
        let Some(highlight) = &self.highlight else {
            return;
        };

        let positions = self.engine.positions();
        let bounds = BoundingBox::from_points(
            highlight
                .relevant_nodes()
                .into_iter()
                .filter_map(|index| positions.get(index).copied()),
        );
        let Some(bounds) = bounds else {
            return;
        };

        let target = fit_camera(bounds, rect.size());
        self.transition = Some(CameraTransition::new(self.camera, target, now));
    }

    pub(in crate::app) fn advance_camera(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };

        let (camera, finished) = transition.sample(now);
        self.camera = camera;
        if finished {
            self.transition = None;
        }
        !finished
    }
}
