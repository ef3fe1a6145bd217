use eframe::egui::{self, RichText, Ui};

use crate::highlight::select_candidates;
use crate::topology::CLUSTERS;

use super::super::ViewModel;
use super::super::render_utils::cluster_color;

impl ViewModel {
    const CANDIDATE_ROW_HEIGHT: f32 = 22.0;

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Vendor, IP address or MAC")
            .on_hover_text("Case-insensitive match against every device field.");
        let mut clear_requested = false;
        ui.horizontal(|ui| {
            let search_response = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Search devices")
                    .desired_width(ui.available_width() - 60.0),
            );
            if search_response.changed() {
                self.candidates = select_candidates(&self.search, &self.graph);
                if self.search.trim().is_empty() {
                    clear_requested = true;
                }
            }
            if ui
                .add_enabled(
                    !self.search.is_empty() || self.selected.is_some(),
                    egui::Button::new("Clear"),
                )
                .clicked()
            {
                clear_requested = true;
            }
        });
        if clear_requested {
            self.clear_search();
        }

        self.draw_candidates(ui);

        ui.separator();
        self.draw_simulation_controls(ui);

        ui.separator();
        ui.label(RichText::new("Clusters").strong());
        for cluster in &CLUSTERS {
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(cluster_color(cluster.id)));
                let members = self
                    .graph
                    .nodes
                    .iter()
                    .filter(|node| !node.is_anchor() && node.cluster() == Some(cluster.id))
                    .count();
                ui.label(format!("{}  ({members} devices)", cluster.label));
            });
        }
        let unresolved = self
            .graph
            .nodes
            .iter()
            .filter(|node| node.is_unresolved())
            .count();
        if unresolved > 0 {
            ui.small(format!("{unresolved} linked MAC addresses not found in the document"));
        }
    }

    fn draw_candidates(&mut self, ui: &mut Ui) {
        if self.candidates.is_empty() {
            if !self.search.trim().is_empty() && self.selected.is_none() {
                ui.small("No matching devices.");
            }
            return;
        }

        let mut picked = None;
        egui::ScrollArea::vertical()
            .id_salt("search_candidates_scroll")
            .max_height(260.0)
            .auto_shrink([false, true])
            .show_rows(
                ui,
                Self::CANDIDATE_ROW_HEIGHT,
                self.candidates.len(),
                |ui, row_range| {
                    for row in row_range {
                        let Some(candidate) = self.candidates.get(row) else {
                            continue;
                        };
                        let is_selected = self.selected == Some(candidate.index);
                        if ui
                            .selectable_label(is_selected, candidate.label.as_str())
                            .on_hover_text(candidate.id.as_str())
                            .clicked()
                        {
                            picked = Some(row);
                        }
                    }
                },
            );

        if let Some(row) = picked {
            let candidate = self.candidates.swap_remove(row);
            self.search = candidate.label;
            self.candidates.clear();
            self.focus_node(candidate.index);
        }
    }

    fn draw_simulation_controls(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Layout").strong());
        ui.horizontal_wrapped(|ui| {
            if ui
                .button("Restart")
                .on_hover_text("Reheat the simulation from full energy.")
                .clicked()
            {
                self.engine.start();
            }
            if ui.button("Stop").clicked() {
                self.engine.stop();
            }
            if ui
                .button("Fit all")
                .on_hover_text("Frame the whole canvas.")
                .clicked()
            {
                self.camera_ready = false;
                self.transition = None;
            }
            if ui
                .add_enabled(self.highlight.is_some(), egui::Button::new("Fit selection"))
                .clicked()
            {
                self.fit_requested = true;
            }
        });
    }
}
