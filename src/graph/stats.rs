//! Graph statistics
//!
//! Summary numbers for a built graph plus the degree filter and component
//! listing used by presentation.

use super::store::SimilarityGraph;
use super::types::NodeId;
use super::{GraphError, GraphResult};
use catalog_graph_algorithms::{connected_components as components_of, top_betweenness};
use serde::{Deserialize, Serialize};

/// How many entries `top_connected` / `top_central` hold
pub const TOP_N: usize = 10;

/// A node and its degree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedNode {
    pub label: String,
    pub degree: usize,
}

/// A node and its normalized betweenness centrality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralNode {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    /// 2m / n
    pub avg_degree: f64,
    /// 2m / (n(n-1)), 0 below two nodes
    pub density: f64,
    pub max_degree: usize,
    pub component_count: usize,
    /// Up to ten nodes by degree, highest first
    pub top_connected: Vec<ConnectedNode>,
    /// Up to ten nodes by betweenness, highest first
    pub top_central: Vec<CentralNode>,
}

/// Compute summary statistics. Fails with `EmptyGraph` on a graph without
/// nodes.
pub fn graph_statistics(graph: &SimilarityGraph) -> GraphResult<GraphStatistics> {
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }

    let n = graph.node_count();
    let m = graph.edge_count();
    let density = if n < 2 {
        0.0
    } else {
        (2 * m) as f64 / (n * (n - 1)) as f64
    };

    Ok(GraphStatistics {
        node_count: n,
        edge_count: m,
        avg_degree: (2 * m) as f64 / n as f64,
        density,
        max_degree: graph.degrees().into_iter().max().unwrap_or(0),
        component_count: components_of(&graph.to_view()).count(),
        top_connected: most_connected(graph, TOP_N),
        top_central: central_nodes(graph, TOP_N),
    })
}

/// The `limit` highest-degree nodes; ties keep node order
pub fn most_connected(graph: &SimilarityGraph, limit: usize) -> Vec<ConnectedNode> {
    let mut ranked: Vec<ConnectedNode> = graph
        .nodes()
        .iter()
        .map(|node| ConnectedNode {
            label: node.label.clone(),
            degree: graph.degree(node.id),
        })
        .collect();
    ranked.sort_by(|a, b| b.degree.cmp(&a.degree));
    ranked.truncate(limit);
    ranked
}

/// The `limit` most central nodes by betweenness over the unweighted
/// topology; ties keep node order
pub fn central_nodes(graph: &SimilarityGraph, limit: usize) -> Vec<CentralNode> {
    let view = graph.to_view();
    top_betweenness(&view, limit)
        .into_iter()
        .filter_map(|score| {
            graph.node(NodeId::new(score.node)).map(|node| CentralNode {
                label: node.label.clone(),
                score: score.score,
            })
        })
        .collect()
}

/// Connected components, largest first. Equal sizes keep the order of
/// their first member; members are in node order.
pub fn connected_components(graph: &SimilarityGraph) -> Vec<Vec<NodeId>> {
    components_of(&graph.to_view())
        .components
        .into_iter()
        .map(|members| members.into_iter().map(NodeId::new).collect())
        .collect()
}

/// Subgraph induced by the nodes whose degree is at least `min_degree`.
///
/// Degrees are taken in the full graph, so a kept node may end up with a
/// lower degree in the result.
pub fn filter_by_degree(graph: &SimilarityGraph, min_degree: usize) -> SimilarityGraph {
    let keep: Vec<NodeId> = graph
        .nodes()
        .iter()
        .map(|n| n.id)
        .filter(|&id| graph.degree(id) >= min_degree)
        .collect();
    graph.induced_subgraph(&keep)
}
