//! In-memory similarity graph
//!
//! Nodes live in a dense vector indexed by [`NodeId`]; edges in insertion
//! order with an `IndexMap` from the normalized endpoint pair to the edge
//! slot, so pair lookup is O(1) and iteration stays deterministic.

use super::edge::{GraphEdge, SharedField};
use super::node::GraphNode;
use super::types::NodeId;
use super::{GraphError, GraphResult};
use crate::record::{FieldValue, RecordId};
use catalog_graph_algorithms::GraphView;
use indexmap::IndexMap;

/// Undirected, weighted, simple graph of records
#[derive(Debug, Clone, Default)]
pub struct SimilarityGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    /// (smaller, larger) endpoint pair -> index into `edges`
    edge_index: IndexMap<(NodeId, NodeId), usize>,
    /// Incident edge indices per node
    adjacency: Vec<Vec<usize>>,
    /// Node key -> id
    keys: IndexMap<String, NodeId>,
}

fn pair_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl SimilarityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id (the next dense index).
    ///
    /// The node's key is its label, suffixed ` (2)`, ` (3)`, ... when the
    /// label is already taken.
    pub fn add_node(
        &mut self,
        record_id: RecordId,
        label: impl Into<String>,
        fields: IndexMap<String, FieldValue>,
    ) -> NodeId {
        let label = label.into();
        let key = self.unique_key(&label);
        self.push_node(record_id, label, key, fields)
    }

    fn unique_key(&self, label: &str) -> String {
        if !self.keys.contains_key(label) {
            return label.to_string();
        }
        (2..)
            .map(|n| format!("{} ({})", label, n))
            .find(|candidate| !self.keys.contains_key(candidate))
            .unwrap_or_default()
    }

    fn push_node(
        &mut self,
        record_id: RecordId,
        label: String,
        key: String,
        fields: IndexMap<String, FieldValue>,
    ) -> NodeId {
        let id = NodeId::from(self.nodes.len());
        let mut node = GraphNode::new(id, record_id, label);
        node.key = key.clone();
        node.fields = fields;
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        self.keys.insert(key, id);
        id
    }

    /// Add an undirected edge.
    ///
    /// Rejects self-loops, zero weights, unknown endpoints and a second edge
    /// for the same pair.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: u32, shared: Vec<SharedField>) -> GraphResult<()> {
        if a == b {
            return Err(GraphError::InvalidInput(format!("self-loop on {}", a)));
        }
        if weight == 0 {
            return Err(GraphError::InvalidInput("edge weight must be positive".to_string()));
        }
        for id in [a, b] {
            if self.node(id).is_none() {
                return Err(GraphError::NodeNotFound(id.to_string()));
            }
        }

        let key = pair_key(a, b);
        if self.edge_index.contains_key(&key) {
            return Err(GraphError::InvalidInput(format!("duplicate edge between {} and {}", key.0, key.1)));
        }

        let slot = self.edges.len();
        self.edges.push(GraphEdge::new(a, b, weight).with_shared(shared));
        self.edge_index.insert(key, slot);
        self.adjacency[a.index()].push(slot);
        self.adjacency[b.index()].push(slot);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index())
    }

    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&GraphEdge> {
        self.edge_index.get(&pair_key(a, b)).map(|&slot| &self.edges[slot])
    }

    /// Node whose unique key is `key`
    pub fn find_by_key(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(id.index()).map(Vec::len).unwrap_or(0)
    }

    /// Degrees of all nodes, in node order
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    /// Neighbors of `id` in edge insertion order
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.incident_edges(id).filter_map(|e| e.other(id)).collect()
    }

    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.adjacency
            .get(id.index())
            .into_iter()
            .flatten()
            .map(move |&slot| &self.edges[slot])
    }

    /// Dense CSR view for the algorithm crate. Edge weights become `f64`.
    pub fn to_view(&self) -> GraphView {
        let index_to_node = self.nodes.iter().map(|n| n.id.as_u64()).collect();
        let edges: Vec<(usize, usize, f64)> = self
            .edges
            .iter()
            .map(|e| (e.source.index(), e.target.index(), e.weight as f64))
            .collect();
        GraphView::from_undirected_edges(index_to_node, &edges)
    }

    /// Subgraph induced by `keep`, renumbered densely in current node order.
    /// Nodes keep their keys.
    ///
    /// Unknown ids are ignored.
    pub fn induced_subgraph(&self, keep: &[NodeId]) -> SimilarityGraph {
        let mut remap: IndexMap<NodeId, NodeId> = IndexMap::new();
        let mut sub = SimilarityGraph::new();

        for node in &self.nodes {
            if keep.contains(&node.id) {
                let new_id = sub.push_node(node.record_id, node.label.clone(), node.key.clone(), node.fields.clone());
                remap.insert(node.id, new_id);
            }
        }

        for edge in &self.edges {
            if let (Some(&a), Some(&b)) = (remap.get(&edge.source), remap.get(&edge.target)) {
                let slot = sub.edges.len();
                sub.edges.push(GraphEdge::new(a, b, edge.weight).with_shared(edge.shared.clone()));
                sub.edge_index.insert(pair_key(a, b), slot);
                sub.adjacency[a.index()].push(slot);
                sub.adjacency[b.index()].push(slot);
            }
        }

        sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_tail() -> SimilarityGraph {
        // 0 - 1 - 2 - 0, 2 - 3
        let mut graph = SimilarityGraph::new();
        for (i, label) in ["a", "b", "c", "d"].iter().enumerate() {
            graph.add_node(RecordId::new(i as u64), *label, IndexMap::new());
        }
        graph.add_edge(NodeId(0), NodeId(1), 1, vec![]).unwrap();
        graph.add_edge(NodeId(1), NodeId(2), 2, vec![]).unwrap();
        graph.add_edge(NodeId(2), NodeId(0), 1, vec![]).unwrap();
        graph.add_edge(NodeId(3), NodeId(2), 3, vec![]).unwrap();
        graph
    }

    #[test]
    fn test_add_and_query() {
        let graph = triangle_with_tail();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.degree(NodeId(2)), 3);
        assert_eq!(graph.degrees(), vec![2, 2, 3, 1]);
        assert_eq!(graph.neighbors(NodeId(2)), vec![NodeId(1), NodeId(0), NodeId(3)]);
        assert_eq!(graph.edge_between(NodeId(2), NodeId(3)).map(|e| e.weight), Some(3));
        assert_eq!(graph.find_by_key("d"), Some(NodeId(3)));
        assert_eq!(graph.find_by_key("z"), None);
    }

    #[test]
    fn test_repeated_labels_get_distinct_keys() {
        let mut graph = SimilarityGraph::new();
        let first = graph.add_node(RecordId::new(0), "pipeline", IndexMap::new());
        let taken = graph.add_node(RecordId::new(1), "pipeline (2)", IndexMap::new());
        let second = graph.add_node(RecordId::new(2), "pipeline", IndexMap::new());
        let third = graph.add_node(RecordId::new(3), "pipeline", IndexMap::new());

        let keys: Vec<&str> = graph.nodes().iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["pipeline", "pipeline (2)", "pipeline (3)", "pipeline (4)"]);
        assert_eq!(graph.node(second).map(|n| n.label.as_str()), Some("pipeline"));
        assert_eq!(graph.find_by_key("pipeline"), Some(first));
        assert_eq!(graph.find_by_key("pipeline (2)"), Some(taken));
        assert_eq!(graph.find_by_key("pipeline (4)"), Some(third));

        // Keys survive into subgraphs even when the first holder is dropped
        let sub = graph.induced_subgraph(&[second]);
        assert_eq!(sub.nodes()[0].key, "pipeline (3)");
        assert_eq!(sub.find_by_key("pipeline (3)"), Some(NodeId(0)));
    }

    #[test]
    fn test_edge_rejections() {
        let mut graph = triangle_with_tail();

        assert!(matches!(graph.add_edge(NodeId(1), NodeId(1), 1, vec![]), Err(GraphError::InvalidInput(_))));
        assert!(matches!(graph.add_edge(NodeId(0), NodeId(3), 0, vec![]), Err(GraphError::InvalidInput(_))));
        assert!(matches!(graph.add_edge(NodeId(1), NodeId(0), 1, vec![]), Err(GraphError::InvalidInput(_))));
        assert!(matches!(graph.add_edge(NodeId(0), NodeId(9), 1, vec![]), Err(GraphError::NodeNotFound(_))));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_view_mirrors_edges() {
        let view = triangle_with_tail().to_view();

        assert_eq!(view.node_count, 4);
        assert_eq!(view.degree(2), 3);
        assert_eq!(view.edge_weight(3, 2), Some(3.0));
    }

    #[test]
    fn test_induced_subgraph() {
        let graph = triangle_with_tail();
        let sub = graph.induced_subgraph(&[NodeId(1), NodeId(2), NodeId(3)]);

        assert_eq!(sub.node_count(), 3);
        let labels: Vec<&str> = sub.nodes().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "d"]);
        // b-c and c-d survive, renumbered
        assert_eq!(sub.edge_count(), 2);
        assert_eq!(sub.edge_between(NodeId(0), NodeId(1)).map(|e| e.weight), Some(2));
        assert_eq!(sub.edge_between(NodeId(1), NodeId(2)).map(|e| e.weight), Some(3));
    }
}
