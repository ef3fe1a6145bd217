use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::topology::{Node, TopologyGraph};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchCandidate {
    pub index: usize,
    pub id: String,
    pub label: String,
}

impl SearchCandidate {
    fn for_node(index: usize, node: &Node) -> Self {
        let vendor = node
            .device()
            .and_then(|device| device.vendor.as_deref())
            .unwrap_or("Unknown");
        let category = node.group().unwrap_or(node.type_label());

        Self {
            index,
            id: node.id.clone(),
            label: format!("{vendor} - {category} ({})", node.id),
        }
    }
}

fn searchable_fields(node: &Node) -> Vec<&str> {
    let mut fields = vec![node.id.as_str()];
    if let Some(device) = node.device() {
        fields.push(device.mac.as_str());
        fields.extend(device.vendor.as_deref());
        fields.extend(device.addresses.iter().map(String::as_str));
    }
    fields
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), query))
}

/// Nodes whose vendor, address, MAC or id contains `query` (ignoring case),
/// best fuzzy score first.
pub fn select_candidates(query: &str, graph: &TopologyGraph) -> Vec<SearchCandidate> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| !node.is_anchor())
        .filter_map(|(index, node)| {
            let fields = searchable_fields(node);
            if !fields
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
            {
                return None;
            }

            let score = fields
                .iter()
                .filter_map(|field| fuzzy_match_score(&matcher, field, &query))
                .max()
                .unwrap_or(0);
            Some((score, index, node))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored
        .into_iter()
        .map(|(_, index, node)| SearchCandidate::for_node(index, node))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::topology::build_topology;

    fn graph() -> TopologyGraph {
        build_topology(Some(&json!([{ "mac_data": [
            { "Network": [
                { "MAC": "AA:BB:CC:DD:EE:01", "Vendor": "Router Inc", "IP": ["10.0.0.1"] },
                { "MAC": "AA:BB:CC:DD:EE:02", "Vendor": "Acme", "IP": ["10.0.0.2"] },
            ] },
            { "IT": [
                { "MAC": "AA:BB:CC:DD:EE:03", "AA:BB:CC:DD:EE:03": ["FF:FF:FF:FF:FF:FF"] },
            ] },
        ] }])))
        .0
    }

    #[test]
    fn substring_match_ignores_case() {
        let graph = graph();
        let candidates = select_candidates("rout", &graph);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "AA:BB:CC:DD:EE:01");
        assert_eq!(
            candidates[0].label,
            "Router Inc - Network (AA:BB:CC:DD:EE:01)"
        );
    }

    #[test]
    fn matches_addresses_and_mac() {
        let graph = graph();
        let by_ip = select_candidates(" 10.0.0.2 ", &graph);
        assert_eq!(by_ip.len(), 1);
        assert_eq!(by_ip[0].id, "AA:BB:CC:DD:EE:02");

        let by_mac = select_candidates("aa:bb", &graph);
        assert_eq!(by_mac.len(), 3);
        assert!(by_mac.iter().all(|candidate| candidate.id.starts_with("AA:BB")));
    }

    #[test]
    fn better_fuzzy_score_ranks_first() {
        let graph = build_topology(Some(&json!([{ "mac_data": [
            { "IT": [
                { "MAC": "11:22:33:44:55:01", "Vendor": "zzzzacme" },
                { "MAC": "11:22:33:44:55:02", "Vendor": "acme" },
            ] },
        ] }])))
        .0;

        let ids = select_candidates("acme", &graph)
            .into_iter()
            .map(|candidate| candidate.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, ["11:22:33:44:55:02", "11:22:33:44:55:01"]);
    }

    #[test]
    fn equal_scores_keep_node_order() {
        let graph = build_topology(Some(&json!([{ "mac_data": [
            { "OT": [
                { "MAC": "11:22:33:44:55:09", "Vendor": "Acme" },
                { "MAC": "11:22:33:44:55:08", "Vendor": "Acme" },
            ] },
            { "IT": [
                { "MAC": "11:22:33:44:55:07", "Vendor": "Acme" },
            ] },
        ] }])))
        .0;

        let ids = select_candidates("acme", &graph)
            .into_iter()
            .map(|candidate| candidate.id)
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            ["11:22:33:44:55:09", "11:22:33:44:55:08", "11:22:33:44:55:07"]
        );
    }

    #[test]
    fn unresolved_nodes_are_searchable_and_anchors_are_not() {
        let graph = graph();
        let unresolved = select_candidates("ff:ff", &graph);
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].label, "Unknown - Not Found (FF:FF:FF:FF:FF:FF)");

        assert!(select_candidates("cluster", &graph).is_empty());
    }

    #[test]
    fn empty_query_yields_nothing() {
        let graph = graph();
        assert!(select_candidates("", &graph).is_empty());
        assert!(select_candidates("   ", &graph).is_empty());
    }
}
