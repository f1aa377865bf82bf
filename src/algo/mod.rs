//! Graph algorithms module
//!
//! Algorithms are implemented in the `kgmerge-algorithms` crate over a dense
//! CSR view. This module provides the integration/adapter layer: it maps a
//! [`KnowledgeGraph`] onto that view and translates results back to entity
//! ids.

pub mod metrics;
pub mod projection;
pub mod report;

use crate::graph::{EntityId, KnowledgeGraph};
use kgmerge_algorithms::{GraphView, NodeId as AlgoNodeId};

// Re-export algorithms
pub use kgmerge_algorithms::{
    betweenness_centrality, bfs, bfs_distances, degree_centrality, diameter, directed_density,
    eccentricities, radius, undirected_density, weakly_connected_components, BetweennessConfig,
    PathResult, WccResult,
};

pub use metrics::{
    compute_metrics, ComponentSummary, DegreeDistribution, Measure, MetricsReport, PathOutcome,
};
pub use projection::{largest_connected_component, lcc_subgraph, to_undirected_weighted, ProjectedGraph};
pub use report::{AnalysisOptions, AnalysisReport, DimensionStats, NodeAnalysisRow, RankedNode};

/// Build a GraphView from the graph for algorithm execution.
///
/// Algorithm node ids are insertion positions, so results map back through
/// [`entity_at`]. Every directed edge becomes one arc, in edge order.
pub fn build_view(graph: &KnowledgeGraph) -> GraphView {
    let index_to_node: Vec<AlgoNodeId> = (0..graph.node_count() as AlgoNodeId).collect();
    let arcs: Vec<(usize, usize)> = graph
        .edges()
        .iter()
        .filter_map(|edge| {
            let u = graph.node_index(edge.source.as_str())?;
            let v = graph.node_index(edge.target.as_str())?;
            Some((u, v))
        })
        .collect();
    GraphView::from_edges(index_to_node, &arcs)
}

/// Entity id for an algorithm node id produced by [`build_view`]
pub fn entity_at(graph: &KnowledgeGraph, node: AlgoNodeId) -> Option<&EntityId> {
    graph.node_at(node as usize).map(|n| &n.id)
}
