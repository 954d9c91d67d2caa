//! Centrality measures
//!
//! Betweenness centrality (Brandes) over the unweighted topology of an
//! undirected view.

use super::common::{GraphView, NodeId};
use std::collections::VecDeque;

/// Betweenness score for a single node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralityScore {
    pub node: NodeId,
    pub score: f64,
}

/// Betweenness centrality for every node, in dense index order.
///
/// Edge weights are ignored. Scores are normalized by `1 / ((n-1)(n-2))`
/// applied to the two-sided accumulation, which equals the fraction of
/// node pairs whose shortest paths pass through the node. Graphs with fewer
/// than three nodes score zero everywhere.
pub fn betweenness_centrality(view: &GraphView) -> Vec<CentralityScore> {
    let n = view.node_count;
    let mut centrality = vec![0.0f64; n];

    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut dist = vec![-1i64; n];
    let mut delta = vec![0.0f64; n];
    let mut queue = VecDeque::with_capacity(n);

    for s in 0..n {
        stack.clear();
        for p in predecessors.iter_mut() {
            p.clear();
        }
        sigma.iter_mut().for_each(|v| *v = 0.0);
        dist.iter_mut().for_each(|v| *v = -1);
        delta.iter_mut().for_each(|v| *v = 0.0);

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);

        // Single-source shortest paths
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in view.neighbors(v) {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Back-propagation of dependencies
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    let scale = if n > 2 {
        1.0 / (((n - 1) * (n - 2)) as f64)
    } else {
        0.5
    };

    centrality
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| CentralityScore {
            node: view.index_to_node[idx],
            score: raw * scale,
        })
        .collect()
}

/// The `limit` most central nodes, highest first.
///
/// Ties keep dense index order (the sort is stable).
pub fn top_betweenness(view: &GraphView, limit: usize) -> Vec<CentralityScore> {
    let mut scores = betweenness_centrality(view);
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scores.truncate(limit);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_center_has_highest_betweenness() {
        // 1 - 2 - 3
        let view = GraphView::from_undirected_edges(vec![1, 2, 3], &[(0, 1, 1.0), (1, 2, 1.0)]);
        let scores = betweenness_centrality(&view);

        assert_eq!(scores[0].score, 0.0);
        assert!((scores[1].score - 1.0).abs() < 1e-9);
        assert_eq!(scores[2].score, 0.0);
    }

    #[test]
    fn test_star_betweenness() {
        // Center 0 with leaves 1..=3: every leaf pair routes through the center
        let view = GraphView::from_undirected_edges(
            vec![100, 101, 102, 103],
            &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)],
        );
        let top = top_betweenness(&view, 2);

        assert_eq!(top[0].node, 100);
        assert!((top[0].score - 1.0).abs() < 1e-9);
        assert_eq!(top[1].score, 0.0);
        assert_eq!(top[1].node, 101);
    }

    #[test]
    fn test_split_paths_share_credit() {
        // Square 0-1-2-3-0: each opposite pair has two shortest paths
        let view = GraphView::from_undirected_edges(
            vec![0, 1, 2, 3],
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)],
        );
        let scores = betweenness_centrality(&view);
        let expected = scores[0].score;

        assert!(expected > 0.0);
        for s in &scores {
            assert!((s.score - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tiny_graphs_score_zero() {
        let view = GraphView::from_undirected_edges(vec![7, 8], &[(0, 1, 1.0)]);
        assert!(betweenness_centrality(&view).iter().all(|s| s.score == 0.0));

        let empty = GraphView::from_undirected_edges(vec![], &[]);
        assert!(betweenness_centrality(&empty).is_empty());
    }
}
