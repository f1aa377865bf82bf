//! Centrality measures
//!
//! Degree centrality and Brandes betweenness centrality.

use super::common::GraphView;
use std::collections::VecDeque;

/// Configuration for betweenness centrality.
#[derive(Debug, Clone, Copy)]
pub struct BetweennessConfig {
    /// Normalize scores by `1 / ((n-1)(n-2))`.
    pub normalized: bool,
    /// Treat graph as undirected (follow edges both ways).
    pub undirected: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            normalized: true,
            undirected: false,
        }
    }
}

/// Degree centrality for every node (by index).
///
/// The degree is the number of distinct neighbors in the undirected
/// projection, so parallel edges and reciprocal pairs count once and
/// self-loops not at all. Scores lie in `[0, 1]`; a single-node graph
/// scores 0.
pub fn degree_centrality(view: &GraphView) -> Vec<f64> {
    let n = view.node_count;
    if n <= 1 {
        return vec![0.0; n];
    }
    let undirected = view.to_undirected();
    let scale = 1.0 / (n - 1) as f64;
    (0..n)
        .map(|idx| undirected.out_degree(idx) as f64 * scale)
        .collect()
}

/// Betweenness centrality using Brandes' algorithm.
///
/// Parallel edges are collapsed before counting shortest paths; self-loops
/// never lie on a shortest path.
pub fn betweenness_centrality(view: &GraphView, config: BetweennessConfig) -> Vec<f64> {
    let n = view.node_count;
    let mut betweenness = vec![0.0_f64; n];
    if n < 3 {
        return betweenness;
    }

    let graph = if config.undirected {
        view.to_undirected()
    } else {
        view.simplified()
    };

    let mut sigma = vec![0.0_f64; n];
    let mut dist: Vec<i64> = vec![-1; n];
    let mut delta = vec![0.0_f64; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    for s in 0..n {
        sigma.iter_mut().for_each(|x| *x = 0.0);
        dist.iter_mut().for_each(|x| *x = -1);
        delta.iter_mut().for_each(|x| *x = 0.0);
        predecessors.iter_mut().for_each(Vec::clear);
        order.clear();

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);

        // Forward pass: shortest path counts
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in graph.successors(v) {
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

        // Backward pass: accumulate dependencies, farthest first
        for &w in order.iter().rev() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    if config.normalized {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        betweenness.iter_mut().for_each(|b| *b *= scale);
    } else if config.undirected {
        // Each undirected path was counted from both ends
        betweenness.iter_mut().for_each(|b| *b *= 0.5);
    }

    betweenness
}
