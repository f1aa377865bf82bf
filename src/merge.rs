//! Multi-graph merge
//!
//! Composes independently built graphs into one. Nodes are unioned by id and
//! edges by their dedup key, across graphs as well as within one.
//!
//! Attribute precedence: the first graph that defines a node wins for
//! `node_type` and `dimension`. A later graph only fills a field the earlier
//! one left at its default (`unknown` type, no dimension). Labels are always
//! unioned and properties appended.

use crate::dimension::Dimension;
use crate::graph::{Edge, EntityId, GraphError, KnowledgeGraph, PropertyId};
use crate::persistence::{self, PersistenceError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Merge errors
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("No input graphs to compose")]
    NoInputs,

    #[error("Missing merge input {path}: {source}")]
    MissingInput {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type MergeResult<T> = Result<T, MergeError>;

/// An edge asserted by hand rather than derived from records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticEdge {
    pub source: EntityId,
    pub target: EntityId,
    #[serde(default)]
    pub property_id: Option<PropertyId>,
    #[serde(default)]
    pub property_label: Option<String>,
    #[serde(default)]
    pub dimension: Option<Dimension>,
}

impl SyntheticEdge {
    pub fn new(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        property_id: impl Into<PropertyId>,
        property_label: impl Into<String>,
    ) -> Self {
        SyntheticEdge {
            source: source.into(),
            target: target.into(),
            property_id: Some(property_id.into()),
            property_label: Some(property_label.into()),
            dimension: Some(Dimension::Relational),
        }
    }

    fn to_edge(&self) -> Edge {
        Edge::new(
            self.source.clone(),
            self.target.clone(),
            self.property_id.clone(),
            self.property_label.clone(),
        )
        .with_dimension(self.dimension)
    }
}

/// Size of one merge input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSummary {
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
}

/// What a merge did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    pub inputs: Vec<InputSummary>,
    pub node_count: usize,
    pub edge_count: usize,
    /// Node ids present in more than one input, in merged order
    pub shared_nodes: Vec<EntityId>,
    /// Input edges dropped because an identical edge was already merged
    pub duplicate_edges: usize,
    pub synthetic_added: usize,
    /// Synthetic edges already implied by composed data
    pub synthetic_suppressed: usize,
    /// Bare nodes created for synthetic edge endpoints
    pub synthetic_nodes_created: usize,
}

impl MergeReport {
    /// Sum of input node counts minus merged node count
    pub fn nodes_reconciled(&self) -> usize {
        let total: usize = self.inputs.iter().map(|i| i.node_count).sum();
        total.saturating_sub(self.node_count)
    }
}

/// Incremental merger
#[derive(Debug, Default)]
pub struct Merger {
    graph: KnowledgeGraph,
    inputs: Vec<(String, Vec<EntityId>)>,
    report: MergeReport,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one input graph
    pub fn add(&mut self, name: impl Into<String>, input: &KnowledgeGraph) -> MergeResult<()> {
        let name = name.into();
        for node in input.nodes() {
            self.graph.merge_node(node);
        }
        let mut duplicates = 0;
        for edge in input.edges() {
            if !self.graph.insert_edge(edge.clone())? {
                duplicates += 1;
            }
        }
        debug!(
            "Merged {}: {} nodes, {} edges ({} duplicate)",
            name,
            input.node_count(),
            input.edge_count(),
            duplicates
        );
        self.report.duplicate_edges += duplicates;
        self.report.inputs.push(InputSummary {
            name: name.clone(),
            node_count: input.node_count(),
            edge_count: input.edge_count(),
        });
        self.inputs.push((name, input.node_ids().cloned().collect()));
        Ok(())
    }

    /// Add a synthetic edge, creating missing endpoints as bare nodes.
    /// Returns false when the edge already exists.
    pub fn inject(&mut self, edge: &SyntheticEdge) -> MergeResult<bool> {
        for id in [&edge.source, &edge.target] {
            if !self.graph.contains_node(id.as_str()) {
                self.graph.ensure_node(id.clone(), "");
                self.report.synthetic_nodes_created += 1;
            }
        }
        let added = self.graph.insert_edge(edge.to_edge())?;
        if added {
            self.report.synthetic_added += 1;
        } else {
            self.report.synthetic_suppressed += 1;
        }
        Ok(added)
    }

    pub fn finish(mut self) -> MergeResult<(KnowledgeGraph, MergeReport)> {
        if self.inputs.is_empty() {
            return Err(MergeError::NoInputs);
        }

        let mut seen_in: rustc_hash::FxHashMap<&EntityId, usize> = Default::default();
        for (_, ids) in &self.inputs {
            for id in ids {
                *seen_in.entry(id).or_insert(0) += 1;
            }
        }
        self.report.shared_nodes = self
            .graph
            .node_ids()
            .filter(|id| seen_in.get(id).copied().unwrap_or(0) > 1)
            .cloned()
            .collect();

        self.graph.freeze_labels();
        self.report.node_count = self.graph.node_count();
        self.report.edge_count = self.graph.edge_count();
        info!(
            "Merged {} graphs: {} nodes, {} edges, {} shared nodes, {} duplicate edges suppressed",
            self.report.inputs.len(),
            self.report.node_count,
            self.report.edge_count,
            self.report.shared_nodes.len(),
            self.report.duplicate_edges
        );
        Ok((self.graph, self.report))
    }
}

/// Compose graphs in order. Inputs are named by position.
pub fn compose(graphs: &[&KnowledgeGraph]) -> MergeResult<(KnowledgeGraph, MergeReport)> {
    compose_with(graphs, &[])
}

/// Compose graphs, then inject synthetic edges
pub fn compose_with(
    graphs: &[&KnowledgeGraph],
    synthetic: &[SyntheticEdge],
) -> MergeResult<(KnowledgeGraph, MergeReport)> {
    if graphs.is_empty() {
        return Err(MergeError::NoInputs);
    }
    let mut merger = Merger::new();
    for (i, graph) in graphs.iter().enumerate() {
        merger.add(format!("input-{}", i), graph)?;
    }
    for edge in synthetic {
        merger.inject(edge)?;
    }
    merger.finish()
}

/// Load snapshots and compose them. Any unreadable input fails the merge.
pub fn compose_snapshots<P: AsRef<Path>>(
    paths: &[P],
    synthetic: &[SyntheticEdge],
) -> MergeResult<(KnowledgeGraph, MergeReport)> {
    if paths.is_empty() {
        return Err(MergeError::NoInputs);
    }
    let mut merger = Merger::new();
    for path in paths {
        let path = path.as_ref();
        let graph = persistence::load_graph(path).map_err(|source| MergeError::MissingInput {
            path: path.to_path_buf(),
            source,
        })?;
        merger.add(path.display().to_string(), &graph)?;
    }
    for edge in synthetic {
        merger.inject(edge)?;
    }
    merger.finish()
}
