//! CARD Catalog
//!
//! Knowledge-graph construction over a research-metadata catalog of
//! datasets, publications, code repositories and human cellular models.
//!
//! # Architecture
//!
//! - [`record`]: tab-separated table loading, per-entity schemas, value
//!   normalization and a TTL record cache
//! - [`filter`]: column filters, keyword search and the node cap
//! - [`graph`]: similarity graph builder, seeded spring layout, statistics
//!   and adjacency / edge-list exports
//! - [`llm`]: hosted LLM client with input-size checks
//! - [`catalog`]: the load -> filter -> build -> layout pipeline
//!
//! Topology algorithms (betweenness, components, spring layout) live in the
//! `catalog-graph-algorithms` crate and run over a CSR view of the graph.
//!
//! ## Example Usage
//!
//! ```rust
//! use card_catalog::graph::{build_graph, compute_layout, graph_statistics};
//! use card_catalog::record::{Record, RecordId};
//!
//! let records = vec![
//!     Record::new(RecordId::new(0))
//!         .with_field("Study Name", "ADNI")
//!         .with_field("Diseases Included", vec!["Alzheimer's Disease", "MCI"]),
//!     Record::new(RecordId::new(1))
//!         .with_field("Study Name", "AIBL")
//!         .with_field("Diseases Included", vec!["alzheimer's disease"]),
//! ];
//!
//! let graph = build_graph(&records, &["Diseases Included"], 1).unwrap();
//! assert_eq!(graph.edge_count(), 1);
//!
//! let layout = compute_layout(&graph, 42).unwrap();
//! assert_eq!(layout.len(), 2);
//!
//! let stats = graph_statistics(&graph).unwrap();
//! assert_eq!(stats.density, 1.0);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod filter;
pub mod graph;
pub mod llm;
pub mod record;

// Re-export main types for convenience
pub use catalog::{CapPolicy, Catalog, CatalogError, CatalogGraph, CatalogResult, GraphRequest};

pub use config::{CatalogConfig, ConfigError, ConfigResult, LlmProvider};

pub use filter::{cap_records, enforce_capacity, filter_records, search_records, unique_values, FilterSpec};

pub use graph::{
    build_graph, compute_layout, export_adjacency_matrix, export_edge_list, graph_from_edge_list, graph_statistics,
    AdjacencyMatrix, EdgeListRow, GraphBuilder, GraphError, GraphResult, GraphStatistics, Layout, NodeId,
    SimilarityGraph,
};

pub use llm::{LlmClient, LlmError, LlmResult};

pub use record::{
    DataLoader, EntityKind, FieldValue, LoadError, LoadResult, Record, RecordCache, RecordId, RecordStore,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.3.0");
    }
}
