//! Property-based tests for graph construction, merge and projection.
//!
//! - Node union is idempotent
//! - Edge count equals the number of distinct dedup keys
//! - Merge order does not change node ids or label sets
//! - Projection conserves edge weight
//! - The largest component is maximal
//! - Degree centrality stays in [0, 1]

use kgmerge::algo::metrics::{components, degree_centrality};
use kgmerge::{compose, lcc_subgraph, to_undirected_weighted, KnowledgeGraph};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};

type RawEdge = (usize, usize, u8);

fn arb_graph_parts() -> impl Strategy<Value = (usize, Vec<RawEdge>)> {
    (1usize..12).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n, 0u8..4), 0..40)))
}

fn arb_labels() -> impl Strategy<Value = Vec<(usize, String)>> {
    prop::collection::vec((0usize..6, "[a-d]{0,2}"), 0..20)
}

fn node_id(i: usize) -> String {
    format!("Q{}", i)
}

fn build(n: usize, edges: &[RawEdge]) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();
    for i in 0..n {
        graph.ensure_node(node_id(i), "");
    }
    for &(s, t, p) in edges {
        graph
            .add_edge(&node_id(s), &node_id(t), Some(format!("P{}", p).into()), None)
            .unwrap();
    }
    graph
}

fn labelled(labels: &[(usize, String)]) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();
    for (i, label) in labels {
        graph.ensure_node(node_id(*i), label);
    }
    graph
}

fn label_sets(graph: &KnowledgeGraph) -> BTreeMap<String, BTreeSet<String>> {
    graph
        .nodes()
        .map(|n| (n.id.to_string(), n.labels.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn ensure_node_is_idempotent(labels in arb_labels()) {
        let once = labelled(&labels);
        let mut twice = labelled(&labels);
        for (i, label) in &labels {
            twice.ensure_node(node_id(*i), label);
        }
        prop_assert_eq!(label_sets(&once), label_sets(&twice));
        prop_assert_eq!(once.node_count(), twice.node_count());
    }

    #[test]
    fn edge_count_matches_distinct_keys((n, edges) in arb_graph_parts()) {
        let graph = build(n, &edges);
        let distinct: HashSet<RawEdge> = edges.iter().copied().collect();
        prop_assert_eq!(graph.edge_count(), distinct.len());
        prop_assert_eq!(graph.statistics().duplicate_edges, edges.len() - distinct.len());
    }

    #[test]
    fn merge_is_commutative_on_nodes_and_labels(a in arb_labels(), b in arb_labels()) {
        let ga = labelled(&a);
        let gb = labelled(&b);
        let (ab, _) = compose(&[&ga, &gb]).unwrap();
        let (ba, _) = compose(&[&gb, &ga]).unwrap();
        prop_assert_eq!(label_sets(&ab), label_sets(&ba));
    }

    #[test]
    fn projection_conserves_weight((n, edges) in arb_graph_parts()) {
        let graph = build(n, &edges);
        let loops = graph.edges().iter().filter(|e| e.source == e.target).count();
        let projected = to_undirected_weighted(&graph);
        prop_assert_eq!(projected.self_loops_dropped, loops);
        prop_assert_eq!(projected.total_weight(), graph.edge_count() - loops);
        prop_assert_eq!(projected.node_count(), graph.node_count());
    }

    #[test]
    fn largest_component_is_maximal((n, edges) in arb_graph_parts()) {
        let graph = build(n, &edges);
        let lcc = lcc_subgraph(&graph);
        let summary = components(&graph);

        prop_assert_eq!(lcc.node_count(), summary.largest());
        prop_assert!(summary.sizes.iter().all(|&s| s <= lcc.node_count()));
        prop_assert_eq!(components(&lcc).count, 1);
        // Induced: every edge between kept nodes survives
        let kept = graph
            .edges()
            .iter()
            .filter(|e| lcc.contains_node(e.source.as_str()) && lcc.contains_node(e.target.as_str()))
            .count();
        prop_assert_eq!(lcc.edge_count(), kept);
    }

    #[test]
    fn degree_centrality_is_bounded((n, edges) in arb_graph_parts()) {
        let graph = build(n, &edges);
        let centrality = degree_centrality(&graph);
        prop_assert_eq!(centrality.len(), n);
        for (id, &score) in &centrality {
            prop_assert!((0.0..=1.0).contains(&score), "{} has {}", id, score);
            if n > 1 {
                let has_neighbor = graph
                    .edges()
                    .iter()
                    .any(|e| e.source != e.target && (e.source == *id || e.target == *id));
                prop_assert_eq!(score > 0.0, has_neighbor);
            }
        }
    }
}
