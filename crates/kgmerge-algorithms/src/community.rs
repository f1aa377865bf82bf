//! Connected components
//!
//! Weakly connected components via union-find.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// Result of WCC algorithm
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WccResult {
    /// Components as lists of NodeIds.
    ///
    /// Ordered by the dense index of each component's first member; members
    /// are in dense index order.
    pub components: Vec<Vec<NodeId>>,
    /// Map of NodeId -> position in `components`
    pub node_component: HashMap<NodeId, usize>,
}

impl WccResult {
    /// Sizes of all components, in component order
    pub fn sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }

    /// Number of components
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
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
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

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    // Iterate all edges and Union connected nodes
    for u_idx in 0..n {
        for &v_idx in view.successors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    let mut root_slot: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<NodeId>> = Vec::new();
    let mut node_component = HashMap::with_capacity(n);

    for i in 0..n {
        let root = uf.find(i);
        let slot = *root_slot.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        let node_id = view.index_to_node[i];
        components[slot].push(node_id);
        node_component.insert(node_id, slot);
    }

    WccResult {
        components,
        node_component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wcc() {
        // Nodes: 1, 2, 3, 4, 5, 6
        // Edges: 1->2, 3->4->5, 6 (isolated)
        let view = GraphView::from_edges(vec![1, 2, 3, 4, 5, 6], &[(0, 1), (2, 3), (3, 4)]);

        let result = weakly_connected_components(&view);

        assert_eq!(result.count(), 3);
        assert_eq!(result.sizes(), vec![2, 3, 1]);

        let c1 = result.node_component[&1];
        let c2 = result.node_component[&2];
        assert_eq!(c1, c2);

        let c3 = result.node_component[&3];
        let c4 = result.node_component[&4];
        let c5 = result.node_component[&5];
        assert_eq!(c3, c4);
        assert_eq!(c4, c5);
        assert_ne!(c1, c3);
        assert_eq!(result.components[2], vec![6]);
    }

    #[test]
    fn test_wcc_ignores_direction() {
        // 2->1 and 3->1 join all three
        let view = GraphView::from_edges(vec![1, 2, 3], &[(1, 0), (2, 0)]);
        let result = weakly_connected_components(&view);
        assert_eq!(result.count(), 1);
        assert_eq!(result.components[0], vec![1, 2, 3]);
    }

    #[test]
    fn test_wcc_empty() {
        let view = GraphView::from_edges(Vec::new(), &[]);
        let result = weakly_connected_components(&view);
        assert_eq!(result.count(), 0);
    }
}
