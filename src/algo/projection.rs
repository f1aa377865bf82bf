//! Undirected weighted projection and largest connected component
//!
//! The projection collapses the directed multigraph into a simple undirected
//! graph. Each pair's weight is the number of directed edges between the two
//! nodes, in either direction. Self-loops are dropped and counted.

use crate::graph::{EntityId, KnowledgeGraph};
use indexmap::{IndexMap, IndexSet};
use kgmerge_algorithms::{weakly_connected_components, GraphView};

/// Simple undirected graph with edge multiplicities as weights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedGraph {
    nodes: IndexSet<EntityId>,
    /// (lower index, higher index) → weight, in first-seen order
    pairs: IndexMap<(usize, usize), usize>,
    pub self_loops_dropped: usize,
}

impl ProjectedGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct undirected pairs
    pub fn edge_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in the order of the source graph
    pub fn nodes(&self) -> impl Iterator<Item = &EntityId> {
        self.nodes.iter()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// Weight of the pair `{a, b}`, if adjacent
    pub fn weight(&self, a: &str, b: &str) -> Option<usize> {
        let ia = self.nodes.get_index_of(a)?;
        let ib = self.nodes.get_index_of(b)?;
        self.pairs.get(&(ia.min(ib), ia.max(ib))).copied()
    }

    /// Sum of pair weights
    pub fn total_weight(&self) -> usize {
        self.pairs.values().sum()
    }

    fn view(&self) -> GraphView {
        let ids = (0..self.nodes.len() as u64).collect();
        let arcs: Vec<(usize, usize)> = self.pairs.keys().copied().collect();
        GraphView::from_edges(ids, &arcs)
    }

    /// Connected components as index lists, in node order
    fn components(&self) -> Vec<Vec<usize>> {
        weakly_connected_components(&self.view())
            .components
            .into_iter()
            .map(|c| c.into_iter().map(|id| id as usize).collect())
            .collect()
    }

    /// Component node sets, largest first
    pub fn component_ids(&self) -> Vec<Vec<&EntityId>> {
        let mut comps: Vec<Vec<&EntityId>> = self
            .components()
            .into_iter()
            .map(|c| c.into_iter().map(|i| &self.nodes[i]).collect())
            .collect();
        comps.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| min_id(a).cmp(&min_id(b))));
        comps
    }

    /// Node-induced projection over a subset of node indices
    fn induced(&self, keep: &[usize]) -> ProjectedGraph {
        let mut remap = vec![None; self.nodes.len()];
        let mut nodes = IndexSet::with_capacity(keep.len());
        let mut sorted = keep.to_vec();
        sorted.sort_unstable();
        for idx in sorted {
            remap[idx] = Some(nodes.len());
            nodes.insert(self.nodes[idx].clone());
        }
        let pairs = self
            .pairs
            .iter()
            .filter_map(|(&(a, b), &w)| Some(((remap[a]?, remap[b]?), w)))
            .collect();
        ProjectedGraph {
            nodes,
            pairs,
            self_loops_dropped: 0,
        }
    }
}

fn min_id<'a>(component: &[&'a EntityId]) -> Option<&'a EntityId> {
    component.iter().copied().min()
}

/// Collapse a directed multigraph into a weighted simple undirected graph
pub fn to_undirected_weighted(graph: &KnowledgeGraph) -> ProjectedGraph {
    let nodes: IndexSet<EntityId> = graph.node_ids().cloned().collect();
    let mut pairs: IndexMap<(usize, usize), usize> = IndexMap::new();
    let mut self_loops_dropped = 0;

    for edge in graph.edges() {
        let (Some(u), Some(v)) = (
            graph.node_index(edge.source.as_str()),
            graph.node_index(edge.target.as_str()),
        ) else {
            continue;
        };
        if u == v {
            self_loops_dropped += 1;
            continue;
        }
        *pairs.entry((u.min(v), u.max(v))).or_insert(0) += 1;
    }

    ProjectedGraph {
        nodes,
        pairs,
        self_loops_dropped,
    }
}

/// Node indices of the largest component.
///
/// Equal sizes are broken by the component whose smallest node id (string
/// order) is lowest.
fn largest_component_indices(simple: &ProjectedGraph) -> Vec<usize> {
    simple
        .components()
        .into_iter()
        .max_by(|a, b| {
            let min_a = a.iter().map(|&i| &simple.nodes[i]).min();
            let min_b = b.iter().map(|&i| &simple.nodes[i]).min();
            // Reversed so the lower minimum id compares as greater
            a.len().cmp(&b.len()).then_with(|| min_b.cmp(&min_a))
        })
        .unwrap_or_default()
}

/// Largest connected component of a projection. Empty in, empty out.
pub fn largest_connected_component(simple: &ProjectedGraph) -> ProjectedGraph {
    let keep = largest_component_indices(simple);
    simple.induced(&keep)
}

/// The input graph restricted to its largest connected
/// component
pub fn lcc_subgraph(graph: &KnowledgeGraph) -> KnowledgeGraph {
    let simple = to_undirected_weighted(graph);
    let keep = largest_component_indices(&simple);
    graph.subgraph(keep.iter().map(|&i| simple.nodes[i].as_str()))
}
