//! Structural metrics over a knowledge graph
//!
//! Centralities are per node, in node insertion order. Distance measures
//! (diameter, radius) use the undirected projection and are `Undefined`
//! unless it is connected. Shortest paths follow edge direction.

use super::build_view;
use crate::graph::{EntityId, KnowledgeGraph};
use indexmap::IndexMap;
use kgmerge_algorithms::{self as algo, BetweennessConfig};
use serde::Serialize;

/// One metric value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measure {
    Scalar(f64),
    /// Not defined for this graph (e.g. diameter of a disconnected graph)
    Undefined,
    PerNode(IndexMap<EntityId, f64>),
}

impl Measure {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Measure::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Measure::Undefined)
    }

    pub fn per_node(&self) -> Option<&IndexMap<EntityId, f64>> {
        match self {
            Measure::PerNode(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Option<usize>> for Measure {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Measure::Undefined, |v| Measure::Scalar(v as f64))
    }
}

/// Metric name → value bundle, in computation order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricsReport {
    entries: IndexMap<String, Measure>,
}

impl MetricsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, measure: Measure) {
        self.entries.insert(name.into(), measure);
    }

    pub fn get(&self, name: &str) -> Option<&Measure> {
        self.entries.get(name)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Measure::as_scalar)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Measure)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of a shortest path query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOutcome {
    Found(Vec<EntityId>),
    NoPath,
}

impl PathOutcome {
    pub fn hops(&self) -> Option<usize> {
        match self {
            PathOutcome::Found(path) => Some(path.len().saturating_sub(1)),
            PathOutcome::NoPath => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found(_))
    }
}

/// Connected components of the undirected projection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentSummary {
    pub count: usize,
    /// Component sizes, largest first
    pub sizes: Vec<usize>,
}

impl ComponentSummary {
    pub fn largest(&self) -> usize {
        self.sizes.first().copied().unwrap_or(0)
    }
}

/// Summary of the multigraph degree sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeDistribution {
    pub mean: f64,
    pub max: usize,
    pub min: usize,
    /// Population standard deviation
    pub std_dev: f64,
}

fn per_node(graph: &KnowledgeGraph, values: Vec<f64>) -> IndexMap<EntityId, f64> {
    graph.node_ids().cloned().zip(values).collect()
}

/// Distinct undirected neighbors over `n - 1`; 0 when `n <= 1`
pub fn degree_centrality(graph: &KnowledgeGraph) -> IndexMap<EntityId, f64> {
    per_node(graph, algo::degree_centrality(&build_view(graph)))
}

/// Normalized directed betweenness. Parallel edges count as one.
pub fn betweenness_centrality(graph: &KnowledgeGraph) -> IndexMap<EntityId, f64> {
    let scores = algo::betweenness_centrality(&build_view(graph), BetweennessConfig::default());
    per_node(graph, scores)
}

/// Undirected density `2m / (n(n-1))`
pub fn density(graph: &KnowledgeGraph) -> f64 {
    algo::undirected_density(&build_view(graph))
}

/// Directed density over distinct ordered pairs
pub fn directed_density(graph: &KnowledgeGraph) -> f64 {
    algo::directed_density(&build_view(graph))
}

pub fn diameter(graph: &KnowledgeGraph) -> Option<usize> {
    algo::diameter(&build_view(graph))
}

pub fn radius(graph: &KnowledgeGraph) -> Option<usize> {
    algo::radius(&build_view(graph))
}

/// One shortest directed path. Among equal-length paths the one reached
/// first through earlier-inserted edges wins.
pub fn shortest_path(graph: &KnowledgeGraph, source: &str, target: &str) -> PathOutcome {
    let (Some(s), Some(t)) = (graph.node_index(source), graph.node_index(target)) else {
        return PathOutcome::NoPath;
    };
    let view = build_view(graph);
    match algo::bfs(&view, s as u64, t as u64) {
        Some(result) => PathOutcome::Found(
            result
                .path
                .into_iter()
                .filter_map(|n| super::entity_at(graph, n).cloned())
                .collect(),
        ),
        None => PathOutcome::NoPath,
    }
}

/// Directed hop count from `seed` to every reachable node
pub fn hop_distances(graph: &KnowledgeGraph, seed: &str) -> IndexMap<EntityId, usize> {
    let Some(idx) = graph.node_index(seed) else {
        return IndexMap::new();
    };
    let dist = algo::bfs_distances(&build_view(graph), idx);
    graph
        .node_ids()
        .zip(dist)
        .filter_map(|(id, d)| d.map(|d| (id.clone(), d)))
        .collect()
}

pub fn components(graph: &KnowledgeGraph) -> ComponentSummary {
    let result = algo::weakly_connected_components(&build_view(graph));
    let mut sizes = result.sizes();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    ComponentSummary {
        count: result.count(),
        sizes,
    }
}

/// `None` for an empty graph
pub fn degree_distribution(graph: &KnowledgeGraph) -> Option<DegreeDistribution> {
    let view = build_view(graph);
    let degrees: Vec<usize> = (0..view.node_count).map(|i| view.degree(i)).collect();
    let n = degrees.len();
    if n == 0 {
        return None;
    }
    let mean = degrees.iter().sum::<usize>() as f64 / n as f64;
    let variance = degrees
        .iter()
        .map(|&d| (d as f64 - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    Some(DegreeDistribution {
        mean,
        max: degrees.iter().copied().max().unwrap_or(0),
        min: degrees.iter().copied().min().unwrap_or(0),
        std_dev: variance.sqrt(),
    })
}

/// Compute the standard metric bundle
pub fn compute_metrics(graph: &KnowledgeGraph) -> MetricsReport {
    let mut report = MetricsReport::new();
    report.insert("nodes", Measure::Scalar(graph.node_count() as f64));
    report.insert("edges", Measure::Scalar(graph.edge_count() as f64));
    report.insert("density", Measure::Scalar(density(graph)));
    report.insert("directed_density", Measure::Scalar(directed_density(graph)));
    report.insert("diameter", diameter(graph).into());
    report.insert("radius", radius(graph).into());

    let comps = components(graph);
    report.insert("components", Measure::Scalar(comps.count as f64));
    report.insert("largest_component", Measure::Scalar(comps.largest() as f64));

    match degree_distribution(graph) {
        Some(dist) => {
            report.insert("degree_mean", Measure::Scalar(dist.mean));
            report.insert("degree_max", Measure::Scalar(dist.max as f64));
            report.insert("degree_min", Measure::Scalar(dist.min as f64));
            report.insert("degree_std", Measure::Scalar(dist.std_dev));
        }
        None => {
            for name in ["degree_mean", "degree_max", "degree_min", "degree_std"] {
                report.insert(name, Measure::Undefined);
            }
        }
    }

    report.insert("degree_centrality", Measure::PerNode(degree_centrality(graph)));
    report.insert("betweenness_centrality", Measure::PerNode(betweenness_centrality(graph)));
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: &[&str], edges: &[(&str, &str, &str)]) -> KnowledgeGraph {
        let mut g = KnowledgeGraph::new();
        for id in nodes {
            g.ensure_node(*id, "");
        }
        for (s, t, p) in edges {
            g.add_edge(s, t, Some((*p).into()), None).unwrap();
        }
        g
    }

    #[test]
    fn test_disconnected_diameter_undefined() {
        let g = graph(&["Q1", "Q2", "Q3"], &[("Q1", "Q2", "P1")]);
        let metrics = compute_metrics(&g);
        assert!(metrics.get("diameter").unwrap().is_undefined());
        assert!(metrics.get("radius").unwrap().is_undefined());
        assert_eq!(metrics.scalar("components"), Some(2.0));
        assert_eq!(metrics.scalar("largest_component"), Some(2.0));
    }

    #[test]
    fn test_path_graph_measures() {
        let g = graph(&["Q1", "Q2", "Q3"], &[("Q1", "Q2", "P1"), ("Q2", "Q3", "P1")]);
        assert_eq!(diameter(&g), Some(2));
        assert_eq!(radius(&g), Some(1));
        assert!((density(&g) - 2.0 / 3.0).abs() < 1e-9);

        let bc = betweenness_centrality(&g);
        assert!((bc["Q2"] - 0.5).abs() < 1e-9);
        assert_eq!(bc["Q1"], 0.0);
    }

    #[test]
    fn test_degree_centrality_bounds_with_multi_edges() {
        let g = graph(
            &["Q1", "Q2", "Q3"],
            &[("Q1", "Q2", "P1"), ("Q1", "Q2", "P2"), ("Q2", "Q1", "P3")],
        );
        let dc = degree_centrality(&g);
        assert!((dc["Q1"] - 0.5).abs() < 1e-9);
        assert_eq!(dc["Q3"], 0.0);
        assert!(dc.values().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_single_node_centrality_zero() {
        let g = graph(&["Q1"], &[]);
        assert_eq!(degree_centrality(&g)["Q1"], 0.0);
        assert_eq!(diameter(&g), Some(0));
    }

    #[test]
    fn test_shortest_path_directed() {
        let g = graph(&["Q1", "Q2", "Q3"], &[("Q1", "Q2", "P1"), ("Q2", "Q3", "P1")]);
        let path = shortest_path(&g, "Q1", "Q3");
        assert_eq!(
            path,
            PathOutcome::Found(vec![EntityId::new("Q1"), EntityId::new("Q2"), EntityId::new("Q3")])
        );
        assert_eq!(path.hops(), Some(2));
        assert_eq!(shortest_path(&g, "Q3", "Q1"), PathOutcome::NoPath);
        assert_eq!(shortest_path(&g, "Q1", "Q404"), PathOutcome::NoPath);
    }

    #[test]
    fn test_shortest_path_tie_break_by_edge_order() {
        let g = graph(
            &["Q1", "Q2", "Q3", "Q4"],
            &[("Q1", "Q3", "P1"), ("Q1", "Q2", "P1"), ("Q2", "Q4", "P1"), ("Q3", "Q4", "P1")],
        );
        let PathOutcome::Found(path) = shortest_path(&g, "Q1", "Q4") else {
            panic!("expected a path");
        };
        assert_eq!(path[1].as_str(), "Q3");
    }

    #[test]
    fn test_hop_distances_and_distribution() {
        let g = graph(&["Q1", "Q2", "Q3", "Q4"], &[("Q1", "Q2", "P1"), ("Q2", "Q3", "P1")]);
        let hops = hop_distances(&g, "Q1");
        assert_eq!(hops["Q1"], 0);
        assert_eq!(hops["Q3"], 2);
        assert!(!hops.contains_key("Q4"));

        let dist = degree_distribution(&g).unwrap();
        assert_eq!(dist.max, 2);
        assert_eq!(dist.min, 0);
        assert!((dist.mean - 1.0).abs() < 1e-9);
        assert!((dist.std_dev - 0.5f64.sqrt()).abs() < 1e-9);
        assert!(degree_distribution(&KnowledgeGraph::new()).is_none());
    }

    #[test]
    fn test_measure_serializes_undefined_as_null() {
        let mut report = MetricsReport::new();
        report.insert("diameter", Measure::Undefined);
        report.insert("density", Measure::Scalar(0.5));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["diameter"].is_null());
        assert_eq!(json["density"], 0.5);
    }
}
