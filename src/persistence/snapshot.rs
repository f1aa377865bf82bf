//! Graph snapshots
//!
//! A snapshot is a JSON document `{metadata, nodes, edges}` holding every
//! node and edge attribute. Paths ending in `.gz` are gzip-compressed.

use super::{PersistenceError, PersistenceResult};
use crate::graph::{Edge, KnowledgeGraph, Node};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

pub const FORMAT_VERSION: u32 = 1;

/// Snapshot header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(default)]
    pub description: Option<String>,
}

/// Serialized form of a [`KnowledgeGraph`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Snapshot {
    pub fn from_graph(graph: &KnowledgeGraph) -> Self {
        Snapshot {
            metadata: SnapshotMetadata {
                format_version: FORMAT_VERSION,
                created_at: Utc::now(),
                node_count: graph.node_count(),
                edge_count: graph.edge_count(),
                description: None,
            },
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().to_vec(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    /// Rebuild the graph, re-deriving its dedup index
    pub fn into_graph(self) -> PersistenceResult<KnowledgeGraph> {
        if self.metadata.format_version > FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(self.metadata.format_version));
        }
        let expected_edges = self.metadata.edge_count;
        let graph = KnowledgeGraph::from_parts(self.nodes, self.edges)?;
        if graph.edge_count() != expected_edges {
            warn!(
                "Snapshot header lists {} edges, {} remain after dedup",
                expected_edges,
                graph.edge_count()
            );
        }
        Ok(graph)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> PersistenceResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> PersistenceResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Write a snapshot of `graph` to `path`
pub fn save_snapshot(snapshot: &Snapshot, path: impl AsRef<Path>) -> PersistenceResult<()> {
    let path = path.as_ref();
    let file = BufWriter::new(File::create(path)?);
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        snapshot.write_to(&mut encoder)?;
        encoder.finish()?.flush()?;
    } else {
        let mut file = file;
        snapshot.write_to(&mut file)?;
        file.flush()?;
    }
    info!(
        "Saved snapshot to {}: {} nodes, {} edges",
        path.display(),
        snapshot.metadata.node_count,
        snapshot.metadata.edge_count
    );
    Ok(())
}

pub fn load_snapshot(path: impl AsRef<Path>) -> PersistenceResult<Snapshot> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);
    let snapshot = if is_gzip(path) {
        Snapshot::read_from(GzDecoder::new(file))?
    } else {
        Snapshot::read_from(file)?
    };
    debug!(
        "Loaded snapshot {} (created {})",
        path.display(),
        snapshot.metadata.created_at
    );
    Ok(snapshot)
}

/// Save `graph` as a snapshot
pub fn save_graph(graph: &KnowledgeGraph, path: impl AsRef<Path>) -> PersistenceResult<SnapshotMetadata> {
    let snapshot = Snapshot::from_graph(graph);
    save_snapshot(&snapshot, path)?;
    Ok(snapshot.metadata)
}

/// Load a graph from a snapshot
pub fn load_graph(path: impl AsRef<Path>) -> PersistenceResult<KnowledgeGraph> {
    load_snapshot(path)?.into_graph()
}
