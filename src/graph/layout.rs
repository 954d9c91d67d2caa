//! Graph layout adapter
//!
//! Runs the spring layout from `catalog-graph-algorithms` over the graph's
//! CSR view and maps the dense results back onto node ids.

use super::store::SimilarityGraph;
use super::types::NodeId;
use super::{GraphError, GraphResult};
use catalog_graph_algorithms::{spring_layout, SpringLayoutConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Node positions in node order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    positions: IndexMap<NodeId, (f64, f64)>,
}

impl Layout {
    pub fn get(&self, id: NodeId) -> Option<(f64, f64)> {
        self.positions.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, (f64, f64))> + '_ {
        self.positions.iter().map(|(&id, &pos)| (id, pos))
    }

    /// `(min_x, min_y, max_x, max_y)`, `None` for an empty layout
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut iter = self.positions.values();
        let &(x0, y0) = iter.next()?;
        Some(iter.fold((x0, y0, x0, y0), |(min_x, min_y, max_x, max_y), &(x, y)| {
            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
        }))
    }
}

/// Spring layout with the default parameters (`k = 2.5`, 50 iterations,
/// scale 1000).
pub fn compute_layout(graph: &SimilarityGraph, seed: u64) -> GraphResult<Layout> {
    compute_layout_with(graph, &SpringLayoutConfig::default(), seed)
}

/// Spring layout with explicit parameters. Same graph, config and seed give
/// the same coordinates.
pub fn compute_layout_with(graph: &SimilarityGraph, config: &SpringLayoutConfig, seed: u64) -> GraphResult<Layout> {
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }

    let view = graph.to_view();
    let positions = spring_layout(&view, config, seed)
        .into_iter()
        .map(|(id, pos)| (NodeId::new(id), (pos.x, pos.y)))
        .collect();

    debug!(nodes = graph.node_count(), seed, iterations = config.iterations, "Computed layout");
    Ok(Layout { positions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    fn graph(n: usize, edges: &[(u64, u64)]) -> SimilarityGraph {
        let mut g = SimilarityGraph::new();
        for i in 0..n {
            g.add_node(RecordId::new(i as u64), format!("n{}", i), IndexMap::new());
        }
        for &(a, b) in edges {
            g.add_edge(NodeId(a), NodeId(b), 1, vec![]).unwrap();
        }
        g
    }

    #[test]
    fn test_empty_graph_is_rejected() {
        assert_eq!(compute_layout(&SimilarityGraph::new(), 42), Err(GraphError::EmptyGraph));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let g = graph(6, &[(0, 1), (1, 2), (2, 0), (3, 4)]);
        let first = compute_layout(&g, 42).unwrap();
        let second = compute_layout(&g, 42).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
        assert!(first.iter().all(|(_, (x, y))| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn test_isolated_nodes_are_spread() {
        let g = graph(4, &[]);
        let layout = compute_layout(&g, 7).unwrap();
        let points: Vec<(f64, f64)> = layout.iter().map(|(_, p)| p).collect();

        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert_ne!(points[i], points[j]);
            }
        }
        let (min_x, min_y, max_x, max_y) = layout.bounds().unwrap();
        assert!(min_x.abs().max(max_x.abs()).max(min_y.abs()).max(max_y.abs()) <= 1000.0 + 1e-6);
    }

    #[test]
    fn test_single_node_at_origin() {
        let layout = compute_layout(&graph(1, &[]), 42).unwrap();
        assert_eq!(layout.get(NodeId(0)), Some((0.0, 0.0)));
    }
}
