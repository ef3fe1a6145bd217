use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::build::build_topology;
use super::graph::TopologyGraph;

pub struct LoadedTopology {
    pub path: PathBuf,
    pub graph: TopologyGraph,
    /// Why the graph is empty, when it is.
    pub problem: Option<String>,
}

pub fn read_document(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read topology document {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Reads and builds a document. Intake failures are treated as "no document",
/// so the result always carries a graph, possibly empty.
pub fn load_topology(path: &Path) -> LoadedTopology {
    let (document, intake_problem) = match read_document(path) {
        Ok(document) => (Some(document), None),
        Err(error) => {
            log::warn!("{error:#}");
            (None, Some(format!("{error:#}")))
        }
    };

    let (graph, format_error) = build_topology(document.as_ref());
    let problem = intake_problem.or_else(|| format_error.map(|error| error.to_string()));

    LoadedTopology {
        path: path.to_path_buf(),
        graph,
        problem,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"mac_data": [{{"IT Workstations": [{{"MAC": "AA:00:00:00:00:01", "status": "true"}}]}}]}}]"#
        )
        .unwrap();

        let loaded = load_topology(file.path());
        assert!(loaded.problem.is_none());
        assert_eq!(loaded.graph.node_count(), 4);
    }

    #[test]
    fn invalid_json_yields_empty_graph_with_problem() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let loaded = load_topology(file.path());
        assert!(loaded.graph.is_empty());
        assert!(loaded.problem.unwrap().contains("not valid JSON"));
    }

    #[test]
    fn wrong_shape_reports_format_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mac_data": []}}"#).unwrap();

        let loaded = load_topology(file.path());
        assert!(loaded.graph.is_empty());
        assert!(loaded.problem.unwrap().starts_with("invalid topology format"));
    }

    #[test]
    fn missing_file_is_not_fatal() {
        let loaded = load_topology(Path::new("/definitely/not/here.json"));
        assert!(loaded.graph.is_empty());
        assert!(loaded.problem.is_some());
    }
}
