use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::highlight::{Camera, CameraTransition, HighlightState, SearchCandidate};
use crate::layout::{LayoutConfig, LayoutEngine};
use crate::topology::{LoadedTopology, TopologyGraph, load_topology};

mod graph;
mod render_utils;
mod ui;

pub struct TopologyApp {
    config: LayoutConfig,
    document_path: String,
    state: AppState,
}

enum AppState {
    Loading { rx: Receiver<LoadedTopology> },
    Ready(Box<ViewModel>),
    Empty { path: Option<PathBuf>, problem: String },
}

struct ViewModel {
    path: PathBuf,
    graph: TopologyGraph,
    engine: LayoutEngine,
    camera: Camera,
    camera_ready: bool,
    transition: Option<CameraTransition>,
    search: String,
    candidates: Vec<SearchCandidate>,
    selected: Option<usize>,
    highlight: Option<HighlightState>,
    fit_requested: bool,
}

impl TopologyApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        document: Option<PathBuf>,
        config: LayoutConfig,
    ) -> Self {
        let document_path = document
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        let state = match document {
            Some(path) => Self::start_load(path),
            None => AppState::Empty {
                path: None,
                problem: "Open a topology document to begin.".to_owned(),
            },
        };

        Self {
            config,
            document_path,
            state,
        }
    }

    fn spawn_load(path: PathBuf) -> Receiver<LoadedTopology> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(load_topology(&path));
        });

        rx
    }

    fn start_load(path: PathBuf) -> AppState {
        log::info!("loading topology from {}", path.display());
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }

    fn ready_state(loaded: LoadedTopology, config: LayoutConfig) -> AppState {
        if loaded.graph.is_empty() {
            return AppState::Empty {
                path: Some(loaded.path),
                problem: loaded
                    .problem
                    .unwrap_or_else(|| "The document contains no devices.".to_owned()),
            };
        }

        AppState::Ready(Box::new(ViewModel::new(loaded, config)))
    }

    fn requested_document(&mut self, ctx: &Context) -> Option<PathBuf> {
        let dropped = ctx.input(|input| {
            input
                .raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            self.document_path = path.display().to_string();
            return Some(path);
        }

        let mut requested = None;
        egui::TopBottomPanel::top("document_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Document");
                    let field = ui.add(
                        egui::TextEdit::singleline(&mut self.document_path)
                            .hint_text("path/to/topology.json")
                            .desired_width(420.0),
                    );
                    let submitted =
                        field.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
                    let loading = matches!(self.state, AppState::Loading { .. });
                    let load_clicked = ui
                        .add_enabled(!loading, egui::Button::new("Load"))
                        .clicked();
                    if (submitted || load_clicked) && !self.document_path.trim().is_empty() {
                        requested = Some(PathBuf::from(self.document_path.trim()));
                    }
                });
            });
        requested
    }
}

impl eframe::App for TopologyApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = self.requested_document(ctx).map(Self::start_load);
        let config = self.config;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(loaded) => {
                        if transition.is_none() {
                            transition = Some(Self::ready_state(loaded, config));
                        }
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        if transition.is_none() {
                            transition = Some(AppState::Empty {
                                path: None,
                                problem: "Background load worker disconnected".to_owned(),
                            });
                        }
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading topology...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Empty { path, problem } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("No topology to show");
                        ui.add_space(6.0);
                        if let Some(path) = path.as_ref() {
                            ui.small(path.display().to_string());
                        }
                        ui.label(problem.as_str());
                        if let Some(path) = path.clone() {
                            ui.add_space(10.0);
                            if ui.button("Retry").clicked() && transition.is_none() {
                                transition = Some(Self::start_load(path));
                            }
                        }
                    });
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            if let AppState::Ready(model) = &mut self.state {
                model.engine.stop();
            }
            self.state = next_state;
        }
    }
}
