//! Analysis report over a merged graph
//!
//! Bundles the metric set with rankings, predicate frequencies, dimension
//! breakdowns and paths between the designated main nodes.

use super::metrics::{self, compute_metrics, MetricsReport, PathOutcome};
use crate::dimension::Dimension;
use crate::graph::{EntityId, GraphStatistics, KnowledgeGraph, Node, NodeType};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// What to include in a report
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub top_degree: usize,
    pub top_betweenness: usize,
    pub top_predicates: usize,
    /// Nodes flagged in the node table; paths are reported between each pair
    pub main_nodes: Vec<EntityId>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            top_degree: 15,
            top_betweenness: 10,
            top_predicates: 10,
            main_nodes: Vec::new(),
        }
    }
}

/// A node with one score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub id: EntityId,
    pub label: String,
    pub node_type: NodeType,
    pub dimension: Option<Dimension>,
    pub score: f64,
}

/// Per-node row of the analysis table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAnalysisRow {
    pub id: EntityId,
    /// Primary label, or the id when unlabelled
    pub label: String,
    pub node_type: NodeType,
    pub dimension: Option<Dimension>,
    pub degree_centrality: f64,
    pub betweenness: f64,
    /// Multigraph degree (in + out)
    pub degree: usize,
    pub is_main: bool,
}

/// Aggregates for the nodes of one dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionStats {
    pub dimension: Dimension,
    pub node_count: usize,
    pub mean_degree_centrality: f64,
    pub mean_betweenness: f64,
    pub mean_degree: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredicateCount {
    pub property_id: String,
    pub property_label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainPath {
    pub source: EntityId,
    pub target: EntityId,
    pub outcome: PathOutcome,
}

/// Full analysis of one graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub statistics: GraphStatistics,
    pub metrics: MetricsReport,
    pub top_degree: Vec<RankedNode>,
    pub top_betweenness: Vec<RankedNode>,
    pub top_predicates: Vec<PredicateCount>,
    /// Unclassified nodes count under `N/A`
    pub nodes_per_dimension: BTreeMap<Dimension, usize>,
    pub shared_nodes: Vec<EntityId>,
    pub main_paths: Vec<MainPath>,
    /// Sorted by degree centrality, highest first
    pub nodes: Vec<NodeAnalysisRow>,
    pub dimension_stats: Vec<DimensionStats>,
}

fn ranked(graph: &KnowledgeGraph, scores: &IndexMap<EntityId, f64>, limit: usize) -> Vec<RankedNode> {
    let mut entries: Vec<(&EntityId, f64)> = scores.iter().map(|(id, &s)| (id, s)).collect();
    // Stable: equal scores keep insertion order
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
        .into_iter()
        .take(limit)
        .filter_map(|(id, score)| {
            graph.get_node(id.as_str()).map(|node| RankedNode {
                id: id.clone(),
                label: node.display_name().to_string(),
                node_type: node.node_type,
                dimension: node.dimension,
                score,
            })
        })
        .collect()
}

fn dimension_of(node: &Node) -> Dimension {
    node.dimension.unwrap_or(Dimension::NotApplicable)
}

impl AnalysisReport {
    /// Analyze `graph`. `shared_nodes` usually comes from the merge report.
    pub fn compute(graph: &KnowledgeGraph, options: &AnalysisOptions, shared_nodes: &[EntityId]) -> Self {
        let metrics = compute_metrics(graph);
        let empty = IndexMap::new();
        let degree_c = metrics
            .get("degree_centrality")
            .and_then(|m| m.per_node())
            .unwrap_or(&empty);
        let betweenness = metrics
            .get("betweenness_centrality")
            .and_then(|m| m.per_node())
            .unwrap_or(&empty);

        let top_degree = ranked(graph, degree_c, options.top_degree);
        let top_betweenness = ranked(graph, betweenness, options.top_betweenness);

        let top_predicates = graph
            .most_common_predicates(options.top_predicates)
            .into_iter()
            .map(|(key, count)| PredicateCount {
                property_id: key.property_id,
                property_label: key.property_label,
                count,
            })
            .collect();

        let mut nodes_per_dimension = BTreeMap::new();
        for node in graph.nodes() {
            *nodes_per_dimension.entry(dimension_of(node)).or_insert(0) += 1;
        }

        let mut main_paths = Vec::new();
        for (i, source) in options.main_nodes.iter().enumerate() {
            for target in &options.main_nodes[i + 1..] {
                main_paths.push(MainPath {
                    source: source.clone(),
                    target: target.clone(),
                    outcome: metrics::shortest_path(graph, source.as_str(), target.as_str()),
                });
            }
        }

        let mut nodes: Vec<NodeAnalysisRow> = graph
            .nodes()
            .map(|node| NodeAnalysisRow {
                id: node.id.clone(),
                label: node.display_name().to_string(),
                node_type: node.node_type,
                dimension: node.dimension,
                degree_centrality: degree_c.get(&node.id).copied().unwrap_or(0.0),
                betweenness: betweenness.get(&node.id).copied().unwrap_or(0.0),
                degree: graph.degree(node.id.as_str()),
                is_main: options.main_nodes.contains(&node.id),
            })
            .collect();
        nodes.sort_by(|a, b| b.degree_centrality.total_cmp(&a.degree_centrality));

        let dimension_stats = dimension_stats(graph, &nodes);

        // The per-node maps live on in `nodes`
        let mut summary = MetricsReport::new();
        for (name, measure) in metrics.iter() {
            if measure.per_node().is_none() {
                summary.insert(name.clone(), measure.clone());
            }
        }

        AnalysisReport {
            statistics: graph.statistics(),
            metrics: summary,
            top_degree,
            top_betweenness,
            top_predicates,
            nodes_per_dimension,
            shared_nodes: shared_nodes.to_vec(),
            main_paths,
            nodes,
            dimension_stats,
        }
    }
}

fn dimension_stats(graph: &KnowledgeGraph, rows: &[NodeAnalysisRow]) -> Vec<DimensionStats> {
    let mut groups: BTreeMap<Dimension, Vec<&NodeAnalysisRow>> = BTreeMap::new();
    for row in rows {
        let dim = graph
            .get_node(row.id.as_str())
            .map(dimension_of)
            .unwrap_or(Dimension::NotApplicable);
        groups.entry(dim).or_default().push(row);
    }
    groups
        .into_iter()
        .map(|(dimension, rows)| {
            let n = rows.len() as f64;
            DimensionStats {
                dimension,
                node_count: rows.len(),
                mean_degree_centrality: rows.iter().map(|r| r.degree_centrality).sum::<f64>() / n,
                mean_betweenness: rows.iter().map(|r| r.betweenness).sum::<f64>() / n,
                mean_degree: rows.iter().map(|r| r.degree as f64).sum::<f64>() / n,
            }
        })
        .collect()
}
