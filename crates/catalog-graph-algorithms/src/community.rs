//! Community detection algorithms
//!
//! Connected components of an undirected view.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// Result of the connected components pass
pub struct ComponentsResult {
    /// Components, largest first; members in dense index order
    pub components: Vec<Vec<NodeId>>,
}

impl ComponentsResult {
    pub fn count(&self) -> usize {
        self.components.len()
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Connected Components
///
/// Finds all disjoint subgraphs. Components are ordered by size descending;
/// equal sizes keep the order of their first member.
pub fn connected_components(view: &GraphView) -> ComponentsResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u_idx in 0..n {
        for &v_idx in view.neighbors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    // Group by root, preserving first-seen order
    let mut root_slot: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<NodeId>> = Vec::new();
    for i in 0..n {
        let root = uf.find(i);
        let slot = *root_slot.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(view.index_to_node[i]);
    }

    groups.sort_by(|a, b| b.len().cmp(&a.len()));

    ComponentsResult { components: groups }
}
