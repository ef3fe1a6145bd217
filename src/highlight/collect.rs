use std::collections::{HashSet, VecDeque};

use crate::topology::TopologyGraph;

pub(super) fn collect_neighborhood(
    graph: &TopologyGraph,
    selected: usize,
    depth: usize,
    related_nodes: &mut HashSet<usize>,
    related_links: &mut HashSet<usize>,
) {
    let mut queue = VecDeque::from([(selected, 0usize)]);
    let mut visited = HashSet::from([selected]);

    while let Some((node, hops)) = queue.pop_front() {
        if hops >= depth {
            continue;
        }

        let Some(incident) = graph.incident.get(node) else {
            continue;
        };

        for &link_index in incident {
            let link = &graph.links[link_index];
            let next = if link.source == node {
                link.target
            } else {
                link.source
            };

            related_links.insert(link_index);
            if next != selected {
                related_nodes.insert(next);
            }

            if visited.insert(next) {
                queue.push_back((next, hops + 1));
            }
        }
    }
}
