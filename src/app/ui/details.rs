use eframe::egui::{self, RichText, Ui};

use crate::route::{RouteEndpoint, route};
use crate::topology::{LinkKind, Node, NodeKind};
use crate::util::join_list;

use super::super::ViewModel;
use super::super::render_utils::status_color;

pub(in crate::app) fn tooltip_text(node: &Node) -> String {
    let device = match &node.kind {
        NodeKind::ClusterAnchor(cluster) => {
            return format!("{}\nType: Cluster", cluster.cluster().label);
        }
        NodeKind::Device(device) => Some(device),
        NodeKind::Unresolved => None,
    };

    let vendor = device
        .and_then(|device| device.vendor.as_deref())
        .unwrap_or("Unknown Device");
    let addresses = device
        .and_then(|device| join_list(&device.addresses))
        .unwrap_or_else(|| "N/A".to_owned());

    let mut lines = vec![
        vendor.to_owned(),
        format!("MAC: {}", node.id),
        format!("IP: {addresses}"),
        format!("Type: {}", node.type_label()),
    ];

    if let Some(device) = device {
        lines.push(format!("Status: {}", device.status.label()));
        if let Some(protocols) = join_list(&device.protocols) {
            lines.push(format!("Protocol: {protocols}"));
        }
        if let Some(ports) = join_list(&device.ports) {
            lines.push(format!("Port: {ports}"));
        }
    }

    lines.join("\n")
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        match self
            .selected
            .and_then(|index| self.graph.nodes.get(index).map(|node| (index, node)))
        {
            Some((index, node)) => {
                let mut lines = tooltip_text(node).lines().map(str::to_owned).collect::<Vec<_>>();
                if !lines.is_empty() {
                    ui.label(RichText::new(lines.remove(0)).strong());
                }
                for line in lines {
                    ui.label(line);
                }
                if let Some(device) = node.device() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(status_color(device.status)));
                        ui.small(device.status.label());
                    });
                }
                if let Some(position) = self.engine.positions().get(index) {
                    let pinned = if self.engine.is_pinned(index) {
                        "  (pinned)"
                    } else {
                        ""
                    };
                    ui.small(format!("Position: {:.0}, {:.0}{pinned}", position.x, position.y));
                }
            }
            None => {
                ui.label("Select a node from the graph or the search results.");
            }
        }

        self.draw_neighbors(ui);
        self.draw_incident_links(ui);

        ui.separator();
        egui::CollapsingHeader::new(format!("Document issues ({})", self.graph.issues.len()))
            .id_salt("document_issues")
            .default_open(false)
            .show(ui, |ui| {
                if self.graph.issues.is_empty() {
                    ui.label("None.");
                    return;
                }

                egui::ScrollArea::vertical()
                    .id_salt("document_issues_scroll")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        for issue in &self.graph.issues {
                            ui.small(issue.to_string());
                        }
                    });
            });
    }

    fn draw_neighbors(&mut self, ui: &mut Ui) {
        let Some(selected) = self.selected else {
            return;
        };

        ui.separator();
        ui.label(RichText::new("Connected nodes").strong());
        let neighbors = self.graph.neighbors(selected);
        if neighbors.is_empty() {
            ui.label("This node has no links.");
            return;
        }

        let mut picked = None;
        egui::ScrollArea::vertical()
            .id_salt("connected_nodes_scroll")
            .max_height(280.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for index in neighbors {
                    let node = &self.graph.nodes[index];
                    let label = format!("{}  [{}]", node.label(), node.type_label());
                    if ui.link(label).on_hover_text(node.id.as_str()).clicked() {
                        picked = Some(index);
                    }
                }
            });

        if let Some(index) = picked {
            self.focus_node(index);
        }
    }

    fn draw_incident_links(&self, ui: &mut Ui) {
        let Some(selected) = self.selected else {
            return;
        };
        let Some(incident) = self.graph.incident.get(selected) else {
            return;
        };
        if incident.is_empty() {
            return;
        }

        let positions = self.engine.positions();
        egui::CollapsingHeader::new(format!("Links ({})", incident.len()))
            .id_salt("incident_links")
            .default_open(false)
            .show(ui, |ui| {
                for &link_index in incident {
                    let link = &self.graph.links[link_index];
                    let (Some(&from), Some(&to)) =
                        (positions.get(link.source), positions.get(link.target))
                    else {
                        continue;
                    };

                    let source = &self.graph.nodes[link.source];
                    let target = &self.graph.nodes[link.target];
                    let path = route(
                        RouteEndpoint::for_node(source, from),
                        RouteEndpoint::for_node(target, to),
                    );
                    let kind = match link.kind {
                        LinkKind::Membership => "member",
                        LinkKind::DeviceToDevice => "device",
                        LinkKind::InterCluster => "cluster",
                    };
                    let shape = if path.is_arc() { "arc" } else { "line" };
                    ui.small(format!("{} → {}  [{kind}, {shape}]", source.label(), target.label()))
                        .on_hover_text(path.svg_path());
                }
            });
    }
}
