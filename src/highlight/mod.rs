use std::collections::HashSet;

use crate::topology::TopologyGraph;

mod collect;
mod search;
mod viewport;

use self::collect::collect_neighborhood;
pub use self::search::{SearchCandidate, select_candidates};
pub use self::viewport::{BoundingBox, Camera, CameraTransition, fit_camera};

const RELATED_DEPTH: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeCategory {
    /// No selection is active.
    Normal,
    Selected,
    Connected,
    /// Drawn faded and ignored by hit testing.
    Unrelated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkCategory {
    Normal,
    /// Touches the selected node.
    Selected,
    /// Joins two connected nodes.
    Connected,
    Unrelated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightState {
    pub selected: usize,
    pub connected: HashSet<usize>,
    pub incident_links: HashSet<usize>,
}

impl HighlightState {
    pub fn node_category(&self, index: usize) -> NodeCategory {
        if index == self.selected {
            NodeCategory::Selected
        } else if self.connected.contains(&index) {
            NodeCategory::Connected
        } else {
            NodeCategory::Unrelated
        }
    }

    pub fn link_category(&self, graph: &TopologyGraph, link_index: usize) -> LinkCategory {
        let Some(link) = graph.links.get(link_index) else {
            return LinkCategory::Unrelated;
        };

        if link.source == self.selected || link.target == self.selected {
            LinkCategory::Selected
        } else if self.connected.contains(&link.source) && self.connected.contains(&link.target) {
            LinkCategory::Connected
        } else {
            LinkCategory::Unrelated
        }
    }

    /// The selected node followed by its connected nodes in index order.
    pub fn relevant_nodes(&self) -> Vec<usize> {
        let mut connected = self.connected.iter().copied().collect::<Vec<_>>();
        connected.sort_unstable();
        std::iter::once(self.selected).chain(connected).collect()
    }
}

/// Derives the highlight for `selected`, `None` when nothing (valid) is selected.
pub fn classify(selected: Option<usize>, graph: &TopologyGraph) -> Option<HighlightState> {
    let selected = selected.filter(|&index| index < graph.node_count())?;

    let mut connected = HashSet::new();
    let mut incident_links = HashSet::new();
    collect_neighborhood(
        graph,
        selected,
        RELATED_DEPTH,
        &mut connected,
        &mut incident_links,
    );

    Some(HighlightState {
        selected,
        connected,
        incident_links,
    })
}

pub fn node_category(highlight: Option<&HighlightState>, index: usize) -> NodeCategory {
    highlight.map_or(NodeCategory::Normal, |state| state.node_category(index))
}

pub fn link_category(
    highlight: Option<&HighlightState>,
    graph: &TopologyGraph,
    link_index: usize,
) -> LinkCategory {
    highlight.map_or(LinkCategory::Normal, |state| {
        state.link_category(graph, link_index)
    })
}
