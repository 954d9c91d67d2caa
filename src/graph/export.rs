//! Adjacency matrix and edge list exports
//!
//! Both exports are plain data; writing them to CSV / JSON is left to the
//! caller.

use super::edge::SharedField;
use super::store::SimilarityGraph;
use super::{GraphError, GraphResult};
use crate::record::RecordId;
use indexmap::IndexMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Symmetric, node-labelled weight matrix with a zero diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    /// Row / column names in node order: the nodes' unique keys
    pub labels: Vec<String>,
    pub matrix: Array2<f64>,
}

impl AdjacencyMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn weight(&self, row: usize, col: usize) -> Option<f64> {
        self.matrix.get((row, col)).copied()
    }

    /// Rows as plain vectors, for serialization
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.matrix.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

/// One undirected edge as exported. Endpoints are node keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeListRow {
    pub node_a: String,
    pub node_b: String,
    pub weight: u32,
    /// Shared values per field, as stored on the edge
    pub shared: Vec<SharedField>,
    /// `field: v1, v2; field2: v3`, for display only
    pub shared_values: String,
}

pub fn export_adjacency_matrix(graph: &SimilarityGraph) -> AdjacencyMatrix {
    let n = graph.node_count();
    let mut matrix = Array2::<f64>::zeros((n, n));
    for edge in graph.edges() {
        let (a, b) = (edge.source.index(), edge.target.index());
        matrix[[a, b]] = edge.weight as f64;
        matrix[[b, a]] = edge.weight as f64;
    }

    AdjacencyMatrix {
        labels: graph.nodes().iter().map(|n| n.key.clone()).collect(),
        matrix,
    }
}

/// Edges in insertion order, endpoints as node keys
pub fn export_edge_list(graph: &SimilarityGraph) -> Vec<EdgeListRow> {
    let key = |id| graph.node(id).map(|n| n.key.clone()).unwrap_or_default();
    graph
        .edges()
        .iter()
        .map(|edge| EdgeListRow {
            node_a: key(edge.source),
            node_b: key(edge.target),
            weight: edge.weight,
            shared: edge.shared.clone(),
            shared_values: edge.shared_summary(),
        })
        .collect()
}

/// Rebuild a graph from node keys (as in [`AdjacencyMatrix::labels`]) and an
/// edge list.
///
/// Nodes carry no record fields; record ids are the key positions and each
/// key doubles as the label. Rows naming a key not in `nodes` fail with
/// `NodeNotFound`.
pub fn graph_from_edge_list<S: AsRef<str>>(nodes: &[S], rows: &[EdgeListRow]) -> GraphResult<SimilarityGraph> {
    let mut graph = SimilarityGraph::new();
    for (i, key) in nodes.iter().enumerate() {
        graph.add_node(RecordId::new(i as u64), key.as_ref(), IndexMap::new());
    }

    for row in rows {
        let a = graph
            .find_by_key(&row.node_a)
            .ok_or_else(|| GraphError::NodeNotFound(row.node_a.clone()))?;
        let b = graph
            .find_by_key(&row.node_b)
            .ok_or_else(|| GraphError::NodeNotFound(row.node_b.clone()))?;
        graph.add_edge(a, b, row.weight, row.shared.clone())?;
    }

    Ok(graph)
}
