use std::collections::HashMap;

use super::cluster::ClusterId;
use super::error::BuildIssue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceStatus {
    Active,
    Inactive,
}

impl DeviceStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub mac: String,
    pub addresses: Vec<String>,
    pub vendor: Option<String>,
    pub protocols: Vec<String>,
    pub ports: Vec<String>,
    pub status: DeviceStatus,
    /// First whitespace token of the category the device was listed under.
    pub category: String,
    pub cluster: Option<ClusterId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Device(DeviceInfo),
    ClusterAnchor(ClusterId),
    /// Placeholder for a peer address that has no record of its own.
    Unresolved,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_anchor(&self) -> bool {
        matches!(self.kind, NodeKind::ClusterAnchor(_))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.kind, NodeKind::Unresolved)
    }

    pub fn device(&self) -> Option<&DeviceInfo> {
        match &self.kind {
            NodeKind::Device(device) => Some(device),
            _ => None,
        }
    }

    /// Cluster the node is drawn in: anchors own theirs, devices may have one.
    pub fn cluster(&self) -> Option<ClusterId> {
        match &self.kind {
            NodeKind::Device(device) => device.cluster,
            NodeKind::ClusterAnchor(cluster) => Some(*cluster),
            NodeKind::Unresolved => None,
        }
    }

    /// Grouping label. Devices group by their raw category tag, so two
    /// unclassified devices of the same category still share a group.
    pub fn group(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Device(device) => Some(device.category.as_str()),
            NodeKind::ClusterAnchor(cluster) => Some(cluster.cluster().label),
            NodeKind::Unresolved => None,
        }
    }

    pub fn label(&self) -> &str {
        match &self.kind {
            NodeKind::Device(device) => device.vendor.as_deref().unwrap_or(&self.id),
            NodeKind::ClusterAnchor(cluster) => cluster.cluster().label,
            NodeKind::Unresolved => &self.id,
        }
    }

    pub fn type_label(&self) -> &str {
        match &self.kind {
            NodeKind::Device(device) => &device.category,
            NodeKind::ClusterAnchor(_) => "Cluster",
            NodeKind::Unresolved => "Not Found",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    Membership,
    DeviceToDevice,
    InterCluster,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub kind: LinkKind,
    /// Cluster of the device that declared the link, used for coloring.
    pub cluster: Option<ClusterId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopologyGraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub index_by_id: HashMap<String, usize>,
    /// Link indices touching each node, in link order.
    pub incident: Vec<Vec<usize>>,
    pub issues: Vec<BuildIssue>,
}

impl TopologyGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn anchor_index(&self, cluster: ClusterId) -> Option<usize> {
        self.index_of(cluster.cluster().anchor_id)
    }

    pub fn degree(&self, index: usize) -> usize {
        self.incident.get(index).map_or(0, Vec::len)
    }

    /// Nodes sharing a link with `index`, each listed once, in link order.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let mut seen = Vec::new();
        for &link_index in self.incident.get(index).map(Vec::as_slice).unwrap_or(&[]) {
            let link = &self.links[link_index];
            let other = if link.source == index {
                link.target
            } else {
                link.source
            };
            if other != index && !seen.contains(&other) {
                seen.push(other);
            }
        }
        seen
    }

    pub(super) fn rebuild_incident(&mut self) {
        let mut incident = vec![Vec::new(); self.nodes.len()];
        for (link_index, link) in self.links.iter().enumerate() {
            incident[link.source].push(link_index);
            if link.target != link.source {
                incident[link.target].push(link_index);
            }
        }
        self.incident = incident;
    }
}
