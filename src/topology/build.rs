use std::collections::HashMap;

use serde_json::Value;

use super::cluster::ClusterId;
use super::error::{BuildIssue, TopologyError};
use super::graph::{DeviceInfo, DeviceStatus, Link, LinkKind, Node, NodeKind, TopologyGraph};
use super::parse::{RawCategory, parse_document, scalar_string, value_list};

struct PendingDevice {
    id: String,
    cluster: Option<ClusterId>,
    peers: Vec<String>,
    duplicate: bool,
}

#[derive(Default)]
struct GraphAssembler {
    nodes: Vec<Node>,
    links: Vec<Link>,
    index_by_id: HashMap<String, usize>,
    issues: Vec<BuildIssue>,
}

impl GraphAssembler {
    fn push_node(&mut self, node: Node) -> usize {
        let index = self.nodes.len();
        self.index_by_id.insert(node.id.clone(), index);
        self.nodes.push(node);
        index
    }

    fn resolve_or_synthesize(&mut self, source_id: &str, target_id: &str) -> usize {
        if let Some(&index) = self.index_by_id.get(target_id) {
            return index;
        }

        self.issues.push(BuildIssue::DanglingLinkEndpoint {
            source_id: source_id.to_owned(),
            target_id: target_id.to_owned(),
        });
        self.push_node(Node {
            id: target_id.to_owned(),
            kind: NodeKind::Unresolved,
        })
    }

    fn push_link(&mut self, source: usize, target: usize, kind: LinkKind, cluster: Option<ClusterId>) {
        self.links.push(Link {
            source,
            target,
            kind,
            cluster,
        });
    }

    fn add_devices(&mut self, categories: Vec<RawCategory>) -> Vec<PendingDevice> {
        let mut pending = Vec::new();

        for category in categories {
            let tag = category.tag().to_owned();
            let cluster = ClusterId::from_tag(&tag);

            for (position, device) in category.devices.into_iter().enumerate() {
                let device = match device {
                    Ok(device) => device,
                    Err(reason) => {
                        self.issues.push(BuildIssue::MalformedDevice {
                            category: category.name.clone(),
                            position,
                            reason,
                        });
                        continue;
                    }
                };

                let id = device.mac.trim().to_owned();
                if id.is_empty() {
                    self.issues.push(BuildIssue::MalformedDevice {
                        category: category.name.clone(),
                        position,
                        reason: "empty MAC".to_owned(),
                    });
                    continue;
                }

                if self
                    .index_by_id
                    .get(&id)
                    .is_some_and(|&index| self.nodes[index].is_anchor())
                {
                    self.issues.push(BuildIssue::MalformedDevice {
                        category: category.name.clone(),
                        position,
                        reason: format!("MAC {id:?} collides with a cluster anchor id"),
                    });
                    continue;
                }

                let peers = device.peers().into_iter().map(str::to_owned).collect();
                let duplicate = self.index_by_id.contains_key(&id);
                if duplicate {
                    self.issues
                        .push(BuildIssue::DuplicateDevice { id: id.clone() });
                } else {
                    if cluster.is_none() {
                        self.issues.push(BuildIssue::UnclassifiedDevice {
                            id: id.clone(),
                            category: tag.clone(),
                        });
                    }

                    self.push_node(Node {
                        id: id.clone(),
                        kind: NodeKind::Device(DeviceInfo {
                            mac: id.clone(),
                            addresses: value_list(&device.ip),
                            vendor: scalar_string(&device.vendor),
                            protocols: value_list(&device.protocol),
                            ports: value_list(&device.port),
                            status: if device.is_active() {
                                DeviceStatus::Active
                            } else {
                                DeviceStatus::Inactive
                            },
                            category: tag.clone(),
                            cluster,
                        }),
                    });
                }

                pending.push(PendingDevice {
                    id,
                    cluster,
                    peers,
                    duplicate,
                });
            }
        }

        pending
    }

    fn add_device_links(&mut self, pending: Vec<PendingDevice>) {
        for device in pending {
            let Some(&source) = self.index_by_id.get(&device.id) else {
                continue;
            };

            if !device.duplicate
                && let Some(cluster) = device.cluster
                && let Some(&anchor) = self.index_by_id.get(cluster.cluster().anchor_id)
            {
                self.push_link(source, anchor, LinkKind::Membership, Some(cluster));
            }

            for peer in &device.peers {
                if *peer == device.id {
                    self.issues.push(BuildIssue::DroppedLink {
                        source_id: device.id.clone(),
                        target_id: peer.clone(),
                        reason: "device lists itself as a peer",
                    });
                    continue;
                }

                let target = self.resolve_or_synthesize(&device.id, peer);
                self.push_link(source, target, LinkKind::DeviceToDevice, device.cluster);
            }
        }
    }

    fn add_ring_links(&mut self, anchors: &[usize; 3]) {
        for cluster in ClusterId::ALL {
            let source = anchors[cluster.index()];
            let target = anchors[cluster.next_in_ring().index()];
            self.push_link(source, target, LinkKind::InterCluster, None);
        }
    }

    fn finish(self) -> TopologyGraph {
        let mut graph = TopologyGraph {
            nodes: self.nodes,
            links: self.links,
            index_by_id: self.index_by_id,
            incident: Vec::new(),
            issues: self.issues,
        };
        graph.rebuild_incident();
        graph
    }
}

/// Builds the node/link graph for a parsed topology document.
///
/// Never fails outright: a document of the wrong shape yields an empty graph
/// together with [`TopologyError::InvalidTopologyFormat`], and per-record
/// problems are repaired and listed in [`TopologyGraph::issues`].
pub fn build_topology(document: Option<&Value>) -> (TopologyGraph, Option<TopologyError>) {
    let categories = match parse_document(document) {
        Ok(categories) => categories,
        Err(error) => {
            log::warn!("{error}");
            return (TopologyGraph::default(), Some(error));
        }
    };

    let mut assembler = GraphAssembler::default();
    let anchors = ClusterId::ALL.map(|cluster| {
        assembler.push_node(Node {
            id: cluster.cluster().anchor_id.to_owned(),
            kind: NodeKind::ClusterAnchor(cluster),
        })
    });

    let pending = assembler.add_devices(categories);
    assembler.add_device_links(pending);
    assembler.add_ring_links(&anchors);

    let graph = assembler.finish();
    for issue in &graph.issues {
        log::warn!("{issue}");
    }
    log::info!(
        "built topology graph: {} nodes, {} links, {} issues",
        graph.node_count(),
        graph.link_count(),
        graph.issues.len()
    );

    (graph, None)
}
