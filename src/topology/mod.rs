mod build;
mod cluster;
mod error;
mod graph;
mod load;
mod parse;

pub use build::build_topology;
pub use cluster::{CLUSTERS, ClusterId};
pub use graph::{DeviceStatus, LinkKind, Node, NodeKind, TopologyGraph};
pub use load::{LoadedTopology, load_topology};
