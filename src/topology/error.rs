use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("invalid topology format: {0}")]
    InvalidTopologyFormat(String),
}

/// Recoverable conditions met while building a graph. None of them abort the
/// build; they are logged and kept on the graph for the details panel.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildIssue {
    #[error("link {source_id} -> {target_id} referenced a missing node; synthesized a placeholder")]
    DanglingLinkEndpoint { source_id: String, target_id: String },
    #[error("device {id} has category {category:?} which matches no cluster")]
    UnclassifiedDevice { id: String, category: String },
    #[error("skipped record {position} of category {category:?}: {reason}")]
    MalformedDevice {
        category: String,
        position: usize,
        reason: String,
    },
    #[error("device {id} appears more than once; later records only contribute links")]
    DuplicateDevice { id: String },
    #[error("dropped link {source_id} -> {target_id}: {reason}")]
    DroppedLink {
        source_id: String,
        target_id: String,
        reason: &'static str,
    },
}
