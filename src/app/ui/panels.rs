use eframe::egui::{self, Align, Context, Layout};

use crate::highlight::{Camera, classify};
use crate::layout::{LayoutConfig, LayoutEngine, SimulationPhase};
use crate::topology::LoadedTopology;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(loaded: LoadedTopology, config: LayoutConfig) -> Self {
        let LoadedTopology { path, graph, .. } = loaded;
        let mut engine = LayoutEngine::new(&graph, config);
        engine.start();

        log::info!(
            "showing {} nodes and {} links from {}",
            graph.node_count(),
            graph.link_count(),
            path.display()
        );

        Self {
            path,
            graph,
            engine,
            camera: Camera::default(),
            camera_ready: false,
            transition: None,
            search: String::new(),
            candidates: Vec::new(),
            selected: None,
            highlight: None,
            fit_requested: false,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("topograph");
                    ui.separator();
                    ui.label(self.path.display().to_string());
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("links: {}", self.graph.link_count()));
                    if !self.graph.issues.is_empty() {
                        ui.label(format!("issues: {}", self.graph.issues.len()));
                    }
                    if let Some(highlight) = &self.highlight {
                        ui.separator();
                        ui.label(format!(
                            "selection: {} connected, {} links",
                            highlight.connected.len(),
                            highlight.incident_links.len()
                        ));
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.simulation_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    fn simulation_text(&self) -> String {
        let phase = match self.engine.phase() {
            SimulationPhase::Idle => "idle",
            SimulationPhase::Running => "running",
            SimulationPhase::Settling => "settling",
        };
        format!(
            "layout {phase}  |  alpha {:.3}  |  ticks {}",
            self.engine.alpha(),
            self.engine.ticks()
        )
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<usize>) {
        if self.selected == selected {
            return;
        }

        self.selected = selected;
        self.highlight = classify(selected, &self.graph);
        if let Some(index) = selected {
            log::debug!("selected {}", self.graph.nodes[index].id);
        }
    }

    pub(in crate::app) fn focus_node(&mut self, index: usize) {
        self.set_selected(Some(index));
        self.fit_requested = self.highlight.is_some();
    }

    pub(in crate::app) fn clear_search(&mut self) {
        self.search.clear();
        self.candidates.clear();
        self.set_selected(None);
    }
}
