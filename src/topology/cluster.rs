use eframe::egui::{Vec2, vec2};

/// Distance kept between a device and the edge of its cluster circle.
pub const CONTAINMENT_MARGIN: f32 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterId {
    It,
    Network,
    Ot,
}

impl ClusterId {
    /// Ring rotation used for the inter-cluster links.
    pub const ALL: [ClusterId; 3] = [ClusterId::It, ClusterId::Network, ClusterId::Ot];

    pub fn cluster(self) -> &'static Cluster {
        &CLUSTERS[self.index()]
    }

    pub fn index(self) -> usize {
        match self {
            Self::It => 0,
            Self::Network => 1,
            Self::Ot => 2,
        }
    }

    pub fn next_in_ring(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Resolves a category tag (first token of a `mac_data` key) to a cluster.
    pub fn from_tag(tag: &str) -> Option<Self> {
        CLUSTERS
            .iter()
            .find(|cluster| cluster.label == tag)
            .map(|cluster| cluster.id)
    }
}

#[derive(Debug)]
pub struct Cluster {
    pub id: ClusterId,
    pub anchor_id: &'static str,
    pub label: &'static str,
    pub color: [u8; 3],
    pub anchor: (f32, f32),
    pub radius: f32,
    pub display_radius: f32,
}

impl Cluster {
    pub fn anchor_pos(&self) -> Vec2 {
        vec2(self.anchor.0, self.anchor.1)
    }

    /// Largest distance from the anchor a member device may sit at.
    pub fn containment_radius(&self) -> f32 {
        (self.radius - CONTAINMENT_MARGIN).max(0.0)
    }
}

pub static CLUSTERS: [Cluster; 3] = [
    Cluster {
        id: ClusterId::It,
        anchor_id: "IT_Cluster",
        label: "IT",
        color: [0xff, 0xff, 0xff],
        anchor: (400.0, 300.0),
        radius: 250.0,
        display_radius: 30.0,
    },
    Cluster {
        id: ClusterId::Network,
        anchor_id: "Network_Cluster",
        label: "Network",
        color: [0x3b, 0x82, 0xf6],
        anchor: (1200.0, 300.0),
        radius: 250.0,
        display_radius: 30.0,
    },
    Cluster {
        id: ClusterId::Ot,
        anchor_id: "OT_Cluster",
        label: "OT",
        color: [0xf9, 0x73, 0x16],
        anchor: (800.0, 900.0),
        radius: 250.0,
        display_radius: 30.0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_indexed_by_id() {
        for id in ClusterId::ALL {
            assert_eq!(id.cluster().id, id);
        }
    }

    #[test]
    fn tags_are_case_sensitive_labels() {
        assert_eq!(ClusterId::from_tag("IT"), Some(ClusterId::It));
        assert_eq!(ClusterId::from_tag("Network"), Some(ClusterId::Network));
        assert_eq!(ClusterId::from_tag("OT"), Some(ClusterId::Ot));
        assert_eq!(ClusterId::from_tag("ot"), None);
        assert_eq!(ClusterId::from_tag("Cloud"), None);
    }

    #[test]
    fn ring_wraps_around() {
        assert_eq!(ClusterId::It.next_in_ring(), ClusterId::Network);
        assert_eq!(ClusterId::Network.next_in_ring(), ClusterId::Ot);
        assert_eq!(ClusterId::Ot.next_in_ring(), ClusterId::It);
    }

    #[test]
    fn containment_radius_subtracts_margin() {
        assert_eq!(ClusterId::It.cluster().containment_radius(), 220.0);
    }
}
