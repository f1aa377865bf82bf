//! Persistence layer
//!
//! - JSON graph snapshots (optionally gzip-compressed) for cross-run merges
//! - CSV export of node analysis tables and flat node/edge lists

pub mod export;
pub mod snapshot;

pub use export::{export_dimension_stats, export_edges, export_node_analysis, export_nodes};
pub use snapshot::{load_graph, load_snapshot, save_graph, save_snapshot, Snapshot, SnapshotMetadata};

use crate::graph::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    Graph(#[from] GraphError),

    #[error("Unsupported snapshot format version {0}")]
    UnsupportedVersion(u32),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
