//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of an undirected graph in Compressed Sparse
/// Row (CSR) format.
///
/// Every edge is stored once per endpoint, so each node lists all of its
/// neighbors.
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices
    pub targets: Vec<usize>,
    /// Edge weights, aligned with `targets`
    pub weights: Vec<f64>,
}

impl GraphView {
    /// Build an undirected view from `(a, b, weight)` triples over dense indices.
    ///
    /// Neighbor order follows edge order, keeping traversal deterministic for
    /// a fixed input.
    pub fn from_undirected_edges(index_to_node: Vec<NodeId>, edges: &[(usize, usize, f64)]) -> Self {
        let node_count = index_to_node.len();

        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        for &(a, b, w) in edges {
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::with_capacity(edges.len() * 2);
        let mut weights = Vec::with_capacity(edges.len() * 2);
        offsets.push(0);
        for row in adjacency {
            for (target, w) in row {
                targets.push(target);
                weights.push(w);
            }
            offsets.push(targets.len());
        }

        GraphView {
            node_count,
            index_to_node,
            offsets,
            targets,
            weights,
        }
    }

    /// Number of neighbors of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Neighbors of a node, in edge order
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.targets[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Weights aligned with [`neighbors`](Self::neighbors)
    pub fn neighbor_weights(&self, idx: usize) -> &[f64] {
        &self.weights[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Weight of the edge between `idx` and `target`, `None` when the nodes
    /// are not adjacent.
    pub fn edge_weight(&self, idx: usize, target: usize) -> Option<f64> {
        let pos = self.neighbors(idx).iter().position(|&t| t == target)?;
        Some(self.neighbor_weights(idx)[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undirected_view_mirrors_edges() {
        let view = GraphView::from_undirected_edges(vec![10, 20, 30], &[(0, 1, 2.0), (1, 2, 1.0)]);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.neighbors(1), &[0, 2]);
        assert_eq!(view.neighbor_weights(1), &[2.0, 1.0]);
        assert_eq!(view.degree(0), 1);
        assert_eq!(view.degree(2), 1);
        assert_eq!(view.edge_weight(1, 0), Some(2.0));
        assert_eq!(view.edge_weight(0, 1), Some(2.0));
        assert_eq!(view.edge_weight(0, 2), None);
        assert_eq!(view.offsets, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_empty_view() {
        let view = GraphView::from_undirected_edges(vec![], &[]);
        assert_eq!(view.node_count, 0);
        assert_eq!(view.offsets, vec![0]);
        assert!(view.targets.is_empty());
    }
}
