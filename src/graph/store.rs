//! In-memory knowledge graph aggregate
//!
//! Owns the node table (insertion ordered, keyed by entity id) and the edge
//! list. Every edge endpoint refers to an existing node.

use super::edge::{Edge, EdgeKey, PredicateKey};
use super::node::Node;
use super::types::{EntityId, PropertyId};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} already exists")]
    NodeAlreadyExists(EntityId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(EntityId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(EntityId),

    #[error("Empty entity identifier")]
    EmptyIdentifier,
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub self_loops: usize,
    pub labelled_nodes: usize,
    /// Edge insertions rejected as duplicates over the graph's lifetime
    pub duplicate_edges: usize,
    pub distinct_predicates: usize,
}

/// In-memory knowledge graph
///
/// - nodes: EntityId -> Node, in first-seen order
/// - edges: ordered, deduplicated by [`EdgeKey`]
/// - predicate_counts: (property_id, property_label) -> edges carrying it
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: IndexMap<EntityId, Node>,
    edges: Vec<Edge>,
    edge_seen: FxHashSet<EdgeKey>,
    predicate_counts: FxHashMap<PredicateKey, usize>,
    duplicate_edges: usize,
}

impl KnowledgeGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from stored parts, re-deriving the dedup index.
    ///
    /// Duplicate node ids and dangling edges are rejected; duplicate edges are
    /// collapsed.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphResult<Self> {
        let mut graph = KnowledgeGraph::new();
        for node in nodes {
            if node.id.as_str().is_empty() {
                return Err(GraphError::EmptyIdentifier);
            }
            if graph.nodes.contains_key(&node.id) {
                return Err(GraphError::NodeAlreadyExists(node.id));
            }
            graph.nodes.insert(node.id.clone(), node);
        }
        for edge in edges {
            graph.insert_edge(edge)?;
        }
        Ok(graph)
    }

    /// Create the node if absent and add `label` to its label set.
    ///
    /// Calling this repeatedly with the same arguments leaves the node as a
    /// single call would.
    pub fn ensure_node(&mut self, id: impl Into<EntityId>, label: &str) -> &mut Node {
        let id = id.into();
        let node = self
            .nodes
            .entry(id)
            .or_insert_with_key(|id| Node::new(id.clone()));
        node.add_label(label);
        node
    }

    /// Insert a fully formed node, merging into an existing one with the same
    /// id (see [`Node::merge_from`]).
    pub fn merge_node(&mut self, node: &Node) -> &mut Node {
        match self.nodes.entry(node.id.clone()) {
            indexmap::map::Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.merge_from(node);
                existing
            }
            indexmap::map::Entry::Vacant(entry) => entry.insert(node.clone()),
        }
    }

    /// Add an edge between existing nodes.
    ///
    /// Returns `Ok(false)` when an edge with the same key already exists.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        property_id: Option<PropertyId>,
        property_label: Option<String>,
    ) -> GraphResult<bool> {
        self.insert_edge(Edge::new(source, target, property_id, property_label))
    }

    /// Add a prepared edge. Same dedup rule as [`add_edge`](Self::add_edge).
    pub fn insert_edge(&mut self, edge: Edge) -> GraphResult<bool> {
        if !self.nodes.contains_key(edge.source.as_str()) {
            return Err(GraphError::InvalidEdgeSource(edge.source));
        }
        if !self.nodes.contains_key(edge.target.as_str()) {
            return Err(GraphError::InvalidEdgeTarget(edge.target));
        }
        if !self.edge_seen.insert(edge.key()) {
            self.duplicate_edges += 1;
            return Ok(false);
        }
        *self.predicate_counts.entry(edge.predicate_key()).or_insert(0) += 1;
        self.edges.push(edge);
        Ok(true)
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Dense position of a node in insertion order
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Node at a dense position, the inverse of [`node_index`](Self::node_index)
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.nodes.keys()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Mutable access to edge attributes. Endpoints and predicate must not be
    /// changed through this, or the dedup index goes stale.
    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    /// Total degree (in + out) over the directed multigraph
    pub fn degree(&self, id: &str) -> usize {
        self.edges
            .iter()
            .map(|e| (e.source.as_str() == id) as usize + (e.target.as_str() == id) as usize)
            .sum()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Re-derive every node's primary label from its label set
    pub fn freeze_labels(&mut self) {
        for node in self.nodes.values_mut() {
            node.freeze_labels();
        }
    }

    /// Predicate frequencies, most common first; ties by key
    pub fn most_common_predicates(&self, limit: usize) -> Vec<(PredicateKey, usize)> {
        let mut counts: Vec<(PredicateKey, usize)> = self
            .predicate_counts
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(limit);
        counts
    }

    /// Get graph statistics
    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            self_loops: self.edges.iter().filter(|e| e.is_self_loop()).count(),
            labelled_nodes: self.nodes.values().filter(|n| n.label_count() > 0).count(),
            duplicate_edges: self.duplicate_edges,
            distinct_predicates: self.predicate_counts.len(),
        }
    }

    /// Node-induced subgraph over `ids`, keeping this graph's node order
    pub fn subgraph<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> KnowledgeGraph {
        let keep: FxHashSet<&str> = ids.into_iter().collect();
        let mut sub = KnowledgeGraph::new();
        for node in self.nodes.values() {
            if keep.contains(node.id.as_str()) {
                sub.nodes.insert(node.id.clone(), node.clone());
            }
        }
        for edge in &self.edges {
            if keep.contains(edge.source.as_str()) && keep.contains(edge.target.as_str()) {
                // Both endpoints were copied above
                let _ = sub.insert_edge(edge.clone());
            }
        }
        sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_node_idempotent() {
        let mut graph = KnowledgeGraph::new();
        graph.ensure_node("Q1", "A");
        graph.ensure_node("Q1", "A");
        graph.ensure_node("Q1", "");

        assert_eq!(graph.node_count(), 1);
        let node = graph.get_node("Q1").unwrap();
        assert_eq!(node.label_count(), 1);
        assert_eq!(node.label, "A");
    }

    #[test]
    fn test_node_at_inverts_node_index() {
        let mut graph = KnowledgeGraph::new();
        for id in ["Q9", "Q1", "Q5"] {
            graph.ensure_node(id, "");
        }
        let idx = graph.node_index("Q1").unwrap();
        assert_eq!(idx, 1);
        assert_eq!(graph.node_at(idx).unwrap().id.as_str(), "Q1");
        assert!(graph.node_at(3).is_none());
    }

    #[test]
    fn test_add_edge_dedup() {
        let mut graph = KnowledgeGraph::new();
        graph.ensure_node("Q1", "");
        graph.ensure_node("Q2", "");

        assert!(graph.add_edge("Q1", "Q2", Some("P31".into()), Some("instancia de".into())).unwrap());
        assert!(!graph.add_edge("Q1", "Q2", Some("P31".into()), Some("instancia de".into())).unwrap());
        assert!(graph.add_edge("Q1", "Q2", Some("P361".into()), Some("parte de".into())).unwrap());

        assert_eq!(graph.edge_count(), 2);
        let stats = graph.statistics();
        assert_eq!(stats.duplicate_edges, 1);
        assert_eq!(stats.distinct_predicates, 2);
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut graph = KnowledgeGraph::new();
        graph.ensure_node("Q1", "");

        assert_eq!(
            graph.add_edge("Q1", "Q9", None, None),
            Err(GraphError::InvalidEdgeTarget(EntityId::new("Q9")))
        );
        assert_eq!(
            graph.add_edge("Q9", "Q1", None, None),
            Err(GraphError::InvalidEdgeSource(EntityId::new("Q9")))
        );
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_predicate_counts_only_first_occurrence() {
        let mut graph = KnowledgeGraph::new();
        for id in ["Q1", "Q2", "Q3"] {
            graph.ensure_node(id, "");
        }
        graph.add_edge("Q1", "Q2", Some("P17".into()), Some("país".into())).unwrap();
        graph.add_edge("Q1", "Q2", Some("P17".into()), Some("país".into())).unwrap();
        graph.add_edge("Q3", "Q2", Some("P17".into()), Some("país".into())).unwrap();
        graph.add_edge("Q1", "Q3", Some("P31".into()), None).unwrap();

        let top = graph.most_common_predicates(10);
        assert_eq!(top[0].0.property_id, "P17");
        assert_eq!(top[0].1, 2);
        assert_eq!(top[1].1, 1);
    }

    #[test]
    fn test_from_parts_rejects_dangling() {
        let nodes = vec![Node::new("Q1")];
        let edges = vec![Edge::new("Q1", "Q2", None, None)];
        assert!(matches!(
            KnowledgeGraph::from_parts(nodes, edges),
            Err(GraphError::InvalidEdgeTarget(_))
        ));
    }

    #[test]
    fn test_from_parts_rejects_duplicate_node() {
        let nodes = vec![Node::new("Q1"), Node::new("Q1")];
        assert!(matches!(
            KnowledgeGraph::from_parts(nodes, Vec::new()),
            Err(GraphError::NodeAlreadyExists(_))
        ));
    }

    #[test]
    fn test_degree_and_subgraph() {
        let mut graph = KnowledgeGraph::new();
        for id in ["Q1", "Q2", "Q3"] {
            graph.ensure_node(id, "");
        }
        graph.add_edge("Q1", "Q2", Some("P1".into()), None).unwrap();
        graph.add_edge("Q2", "Q3", Some("P1".into()), None).unwrap();
        graph.add_edge("Q2", "Q2", Some("P1".into()), None).unwrap();

        assert_eq!(graph.degree("Q2"), 4);
        assert_eq!(graph.statistics().self_loops, 1);

        let sub = graph.subgraph(["Q1", "Q2"]);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 2);
    }
}
