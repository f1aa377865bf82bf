//! Shared utilities for graph algorithms
//!
//! Provides a read-only, dense view of the graph topology for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Parallel edges are allowed; algorithms that need a simple graph call
/// [`GraphView::simplified`] or [`GraphView::to_undirected`] first.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,

    /// Edge weights: aligned with `out_targets`
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Total degree (in + out). A self-loop contributes two.
    pub fn degree(&self, idx: usize) -> usize {
        self.out_degree(idx) + self.in_degree(idx)
    }

    /// Number of directed edges, parallel edges included
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.out_offsets[idx];
            let end = self.out_offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Build a view from a list of directed `(source_idx, target_idx)` pairs.
    ///
    /// Successor order follows edge order, which keeps BFS tie-breaking stable.
    pub fn from_edges(index_to_node: Vec<NodeId>, edges: &[(usize, usize)]) -> Self {
        let node_count = index_to_node.len();
        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        for &(u, v) in edges {
            outgoing[u].push(v);
            incoming[v].push(u);
        }
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();
        Self::from_adjacency_list(node_count, index_to_node, node_to_index, outgoing, incoming, None)
    }

    /// Helper to create GraphView from adjacency lists
    pub fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        incoming: Vec<Vec<usize>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::new();
        let mut flat_weights = if weights.is_some() { Some(Vec::new()) } else { None };

        out_offsets.push(0);
        for (i, neighbors) in outgoing.into_iter().enumerate() {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());

            if let Some(ref mut w_flat) = flat_weights {
                if let Some(w_row) = weights.as_ref().map(|w| &w[i]) {
                    w_flat.extend(w_row.iter());
                }
            }
        }

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
            weights: flat_weights,
        }
    }

    /// Directed view with parallel edges collapsed (first occurrence kept).
    /// Self-loops are kept.
    pub fn simplified(&self) -> Self {
        let mut outgoing = vec![Vec::new(); self.node_count];
        let mut incoming = vec![Vec::new(); self.node_count];
        for u in 0..self.node_count {
            for &v in self.successors(u) {
                if !outgoing[u].contains(&v) {
                    outgoing[u].push(v);
                    incoming[v].push(u);
                }
            }
        }
        Self::from_adjacency_list(
            self.node_count,
            self.index_to_node.clone(),
            self.node_to_index.clone(),
            outgoing,
            incoming,
            None,
        )
    }

    /// Symmetric simple view: one arc each way per adjacent pair, no self-loops.
    ///
    /// Weights count how many directed edges collapsed into the pair.
    pub fn to_undirected(&self) -> Self {
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); self.node_count];
        let mut weights: Vec<Vec<f64>> = vec![Vec::new(); self.node_count];
        for u in 0..self.node_count {
            for &v in self.successors(u) {
                if u == v {
                    continue;
                }
                match neighbors[u].iter().position(|&n| n == v) {
                    Some(pos) => {
                        weights[u][pos] += 1.0;
                        if let Some(back) = neighbors[v].iter().position(|&n| n == u) {
                            weights[v][back] += 1.0;
                        }
                    }
                    None => {
                        neighbors[u].push(v);
                        weights[u].push(1.0);
                        neighbors[v].push(u);
                        weights[v].push(1.0);
                    }
                }
            }
        }
        let incoming = neighbors.clone();
        Self::from_adjacency_list(
            self.node_count,
            self.index_to_node.clone(),
            self.node_to_index.clone(),
            neighbors,
            incoming,
            Some(weights),
        )
    }
}
