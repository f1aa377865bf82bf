//! Pathfinding algorithms
//!
//! Unweighted shortest paths by breadth-first search.

use super::common::{GraphView, NodeId};
use std::collections::VecDeque;

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    pub path: Vec<NodeId>,
    pub cost: f64,
}

impl PathResult {
    /// Number of edges on the path
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Breadth-First Search (Unweighted Shortest Path)
///
/// Follows outgoing edges only. Among equally short paths the one found
/// first in successor order wins. Returns `None` when either endpoint is
/// unknown or the target is unreachable.
pub fn bfs(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
) -> Option<PathResult> {
    let source_idx = *view.node_to_index.get(&source)?;
    let target_idx = *view.node_to_index.get(&target)?;

    let mut queue = VecDeque::new();
    let mut parent: Vec<Option<usize>> = vec![None; view.node_count];
    let mut visited = vec![false; view.node_count];

    queue.push_back(source_idx);
    visited[source_idx] = true;

    while let Some(current_idx) = queue.pop_front() {
        if current_idx == target_idx {
            // Reconstruct path
            let mut path = Vec::new();
            let mut curr = Some(target_idx);
            while let Some(idx) = curr {
                path.push(view.index_to_node[idx]);
                curr = parent[idx];
            }
            path.reverse();
            return Some(PathResult {
                source,
                target,
                cost: (path.len() - 1) as f64,
                path,
            });
        }

        for &next_idx in view.successors(current_idx) {
            if !visited[next_idx] {
                visited[next_idx] = true;
                parent[next_idx] = Some(current_idx);
                queue.push_back(next_idx);
            }
        }
    }

    None
}

/// Hop distance from `source_idx` to every node, `None` when unreachable.
pub fn bfs_distances(view: &GraphView, source_idx: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; view.node_count];
    if source_idx >= view.node_count {
        return dist;
    }
    let mut queue = VecDeque::new();
    dist[source_idx] = Some(0);
    queue.push_back(source_idx);

    while let Some(u) = queue.pop_front() {
        let next = dist[u].map_or(0, |d| d + 1);
        for &v in view.successors(u) {
            if dist[v].is_none() {
                dist[v] = Some(next);
                queue.push_back(v);
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bfs() {
        // 1->2->3
        let view = GraphView::from_edges(vec![1, 2, 3], &[(0, 1), (1, 2)]);

        let result = bfs(&view, 1, 3).unwrap();
        assert_eq!(result.path, vec![1, 2, 3]);
        assert_eq!(result.cost, 2.0);
        assert_eq!(result.hops(), 2);
    }

    #[test]
    fn test_bfs_respects_direction() {
        let view = GraphView::from_edges(vec![1, 2, 3], &[(0, 1), (1, 2)]);
        assert!(bfs(&view, 3, 1).is_none());
    }

    #[test]
    fn test_bfs_tie_break_by_successor_order() {
        // 1->2->4 and 1->3->4: the branch through 2 was inserted first
        let view = GraphView::from_edges(vec![1, 2, 3, 4], &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let result = bfs(&view, 1, 4).unwrap();
        assert_eq!(result.path, vec![1, 2, 4]);
    }

    #[test]
    fn test_bfs_same_node_and_unknown() {
        let view = GraphView::from_edges(vec![1, 2], &[(0, 1)]);
        let result = bfs(&view, 1, 1).unwrap();
        assert_eq!(result.path, vec![1]);
        assert_eq!(result.hops(), 0);
        assert!(bfs(&view, 1, 99).is_none());
    }

    #[test]
    fn test_bfs_distances() {
        // 0->1->2, 3 isolated
        let view = GraphView::from_edges(vec![1, 2, 3, 4], &[(0, 1), (1, 2)]);
        let dist = bfs_distances(&view, 0);
        assert_eq!(dist, vec![Some(0), Some(1), Some(2), None]);
    }
}
