//! Link geometry: straight segments inside a cluster, arcs across clusters.

use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::topology::Node;

const ARC_RADIUS_FACTOR: f32 = 2.0;

#[derive(Clone, Copy, Debug)]
pub struct RouteEndpoint<'a> {
    pub position: Vec2,
    pub group: Option<&'a str>,
    pub is_anchor: bool,
}

impl<'a> RouteEndpoint<'a> {
    pub fn for_node(node: &'a Node, position: Vec2) -> Self {
        Self {
            position,
            group: node.group(),
            is_anchor: node.is_anchor(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkPath {
    Line {
        from: Vec2,
        to: Vec2,
    },
    /// Small arc swept in the positive-angle direction (clockwise on a y-down
    /// screen).
    Arc {
        from: Vec2,
        to: Vec2,
        radius: f32,
    },
}

pub fn route(source: RouteEndpoint<'_>, target: RouteEndpoint<'_>) -> LinkPath {
    let from = source.position;
    let to = target.position;

    let straight = if source.is_anchor || target.is_anchor {
        source.is_anchor && target.is_anchor
    } else {
        source.group == target.group
    };
    if straight {
        return LinkPath::Line { from, to };
    }

    LinkPath::Arc {
        from,
        to,
        radius: (to - from).length() * ARC_RADIUS_FACTOR,
    }
}

impl LinkPath {
    pub fn is_arc(&self) -> bool {
        matches!(self, Self::Arc { .. })
    }

    pub fn endpoints(&self) -> (Vec2, Vec2) {
        match *self {
            Self::Line { from, to } | Self::Arc { from, to, .. } => (from, to),
        }
    }

    pub fn svg_path(&self) -> String {
        match *self {
            Self::Line { from, to } => format!("M{},{}L{},{}", from.x, from.y, to.x, to.y),
            Self::Arc { from, to, radius } => format!(
                "M{},{}A{radius},{radius} 0 0,1 {},{}",
                from.x, from.y, to.x, to.y
            ),
        }
    }

    /// Center of the arc circle, `None` for lines and degenerate arcs.
    pub fn arc_center(&self) -> Option<Vec2> {
        let Self::Arc { from, to, radius } = *self else {
            return None;
        };

        let chord = to - from;
        let length = chord.length();
        if length <= f32::EPSILON {
            return None;
        }

        let half = length * 0.5;
        let offset = (radius * radius - half * half).max(0.0).sqrt();
        let direction = chord / length;
        let normal = vec2(-direction.y, direction.x);
        Some(from + chord * 0.5 + normal * offset)
    }

    /// Polyline approximation with `segments` pieces; lines yield their two
    /// endpoints.
    pub fn points(&self, segments: usize) -> Vec<Vec2> {
        let (from, to) = self.endpoints();
        let (Some(center), Self::Arc { radius, .. }) = (self.arc_center(), *self) else {
            return vec![from, to];
        };

        let start = (from - center).y.atan2((from - center).x);
        let end = (to - center).y.atan2((to - center).x);
        let mut sweep = end - start;
        if sweep < 0.0 {
            sweep += TAU;
        }

        let segments = segments.max(1);
        let mut points = Vec::with_capacity(segments + 1);
        points.push(from);
        for step in 1..segments {
            let angle = start + sweep * (step as f32 / segments as f32);
            points.push(center + vec2(angle.cos(), angle.sin()) * radius);
        }
        points.push(to);
        points
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::topology::{LinkKind, build_topology};

    fn endpoint(x: f32, y: f32, group: Option<&str>, is_anchor: bool) -> RouteEndpoint<'_> {
        RouteEndpoint {
            position: vec2(x, y),
            group,
            is_anchor,
        }
    }

    #[test]
    fn cross_cluster_device_link_is_an_arc() {
        let (graph, _) = build_topology(Some(&json!([{ "mac_data": [
            { "IT": [{ "MAC": "it-1", "it-1": ["net-1"] }] },
            { "Network": [{ "MAC": "net-1" }] },
        ] }])));
        let link = graph
            .links
            .iter()
            .find(|link| link.kind == LinkKind::DeviceToDevice)
            .unwrap();

        let path = route(
            RouteEndpoint::for_node(&graph.nodes[link.source], vec2(400.0, 300.0)),
            RouteEndpoint::for_node(&graph.nodes[link.target], vec2(1200.0, 300.0)),
        );
        assert!(path.is_arc());
        assert_eq!(
            path,
            LinkPath::Arc {
                from: vec2(400.0, 300.0),
                to: vec2(1200.0, 300.0),
                radius: 1600.0,
            }
        );
    }

    #[test]
    fn same_cluster_and_anchor_pairs_are_straight() {
        let same = route(
            endpoint(0.0, 0.0, Some("IT"), false),
            endpoint(10.0, 0.0, Some("IT"), false),
        );
        assert!(!same.is_arc());

        let anchors = route(
            endpoint(0.0, 0.0, Some("IT"), true),
            endpoint(10.0, 0.0, Some("OT"), true),
        );
        assert!(!anchors.is_arc());

    }

    #[test]
    fn membership_link_to_own_anchor_is_an_arc() {
        let (graph, _) = build_topology(Some(&json!([{ "mac_data": [
            { "IT": [{ "MAC": "it-1" }] },
        ] }])));
        let link = graph
            .links
            .iter()
            .find(|link| link.kind == LinkKind::Membership)
            .unwrap();

        let path = route(
            RouteEndpoint::for_node(&graph.nodes[link.source], vec2(500.0, 350.0)),
            RouteEndpoint::for_node(&graph.nodes[link.target], vec2(400.0, 300.0)),
        );
        assert!(path.is_arc());
        assert!(path.svg_path().starts_with("M500,350A"));
        assert!(path.svg_path().ends_with(" 0 0,1 400,300"));

        let reversed = route(
            endpoint(0.0, 0.0, Some("OT"), true),
            endpoint(10.0, 0.0, Some("OT"), false),
        );
        assert!(reversed.is_arc());
    }

    #[test]
    fn unresolved_peer_of_a_device_is_an_arc() {
        let path = route(
            endpoint(0.0, 0.0, Some("IT"), false),
            endpoint(30.0, 40.0, None, false),
        );
        assert_eq!(
            path,
            LinkPath::Arc {
                from: vec2(0.0, 0.0),
                to: vec2(30.0, 40.0),
                radius: 100.0,
            }
        );
    }

    #[test]
    fn svg_paths_match_line_and_arc_commands() {
        let line = LinkPath::Line {
            from: vec2(1.0, 2.0),
            to: vec2(3.0, 4.0),
        };
        assert_eq!(line.svg_path(), "M1,2L3,4");

        let arc = LinkPath::Arc {
            from: vec2(0.0, 0.0),
            to: vec2(30.0, 40.0),
            radius: 100.0,
        };
        assert_eq!(arc.svg_path(), "M0,0A100,100 0 0,1 30,40");
    }

    #[test]
    fn sampled_arc_stays_on_its_circle_and_bulges_one_way() {
        let path = LinkPath::Arc {
            from: vec2(0.0, 0.0),
            to: vec2(100.0, 0.0),
            radius: 200.0,
        };
        let center = path.arc_center().unwrap();
        assert!(center.y > 0.0);

        let points = path.points(16);
        assert_eq!(points.len(), 17);
        assert_eq!(points[0], vec2(0.0, 0.0));
        assert_eq!(points[16], vec2(100.0, 0.0));
        for point in &points {
            assert!(((*point - center).length() - 200.0).abs() < 0.05);
        }
        assert!(points[8].y < 0.0);
        assert!(points[8].y > -20.0);
    }

    #[test]
    fn degenerate_arc_falls_back_to_endpoints() {
        let path = LinkPath::Arc {
            from: vec2(5.0, 5.0),
            to: vec2(5.0, 5.0),
            radius: 0.0,
        };
        assert_eq!(path.points(8), vec![vec2(5.0, 5.0), vec2(5.0, 5.0)]);
    }
}
