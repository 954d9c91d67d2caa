//! Similarity graph over catalog records
//!
//! This module turns records into an undirected, weighted, simple graph:
//! - one node per record, labelled by the entity's name field
//! - one edge per pair of records sharing values in the connection fields,
//!   weighted by the number of shared values
//! - a seeded spring layout, statistics and matrix / edge-list exports

pub mod builder;
pub mod edge;
pub mod export;
pub mod layout;
pub mod node;
pub mod stats;
pub mod store;
pub mod types;

// Re-export main types
pub use builder::{build_graph, GraphBuilder};
pub use edge::{GraphEdge, SharedField};
pub use export::{export_adjacency_matrix, export_edge_list, graph_from_edge_list, AdjacencyMatrix, EdgeListRow};
pub use layout::{compute_layout, compute_layout_with, Layout};
pub use node::GraphNode;
pub use stats::{
    central_nodes, connected_components, filter_by_degree, graph_statistics, most_connected, CentralNode,
    ConnectedNode, GraphStatistics,
};
pub use store::SimilarityGraph;
pub use types::NodeId;

use thiserror::Error;

/// Graph construction and analysis errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Graph has no nodes")]
    EmptyGraph,

    #[error("{count} records exceed the node cap of {cap}")]
    CapacityExceeded { count: usize, cap: usize },

    #[error("Node '{0}' not found")]
    NodeNotFound(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
