//! kgmerge
//!
//! Build, merge and analyze knowledge-graph extracts from linked-data query
//! results.
//!
//! # Pipeline
//!
//! - `record`: parse result rows, extract entity/property ids, resolve roles
//! - `builder`: fold records into a deduplicated [`KnowledgeGraph`]
//! - `dimension`: classify predicates into thematic dimensions
//! - `merge`: compose independently built graphs, inject synthetic edges
//! - `algo`: undirected projection, largest component, metrics and reports
//! - `expansion` / `enrich`: two-hop expansion and enrichment planning
//! - `persistence`: JSON snapshots and CSV export
//!
//! ## Example Usage
//!
//! ```rust
//! use kgmerge::{compose, compute_metrics, KgBuilder};
//! use serde_json::json;
//!
//! let rows = vec![
//!     json!({"item": {"value": "http://www.wikidata.org/entity/Q1"},
//!            "propiedad": {"value": "http://www.wikidata.org/prop/direct/P131"},
//!            "valor": {"value": "http://www.wikidata.org/entity/Q2"}}),
//! ];
//! let (graph, report) = KgBuilder::build(&rows);
//! assert_eq!(report.edges_added, 1);
//!
//! let (merged, _) = compose(&[&graph, &graph]).unwrap();
//! assert_eq!(merged.edge_count(), 1);
//!
//! let metrics = compute_metrics(&merged);
//! assert_eq!(metrics.scalar("nodes"), Some(2.0));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod builder;
pub mod config;
pub mod dimension;
pub mod enrich;
pub mod expansion;
pub mod graph;
pub mod merge;
pub mod persistence;
pub mod record;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeKey, EntityId, GraphError, GraphResult, GraphStatistics, KnowledgeGraph, Node,
    NodeType, PredicateKey, PropertyId, PropertyMap, PropertyValue,
};

pub use record::{
    load_records, parse_records, BindingValue, NormalizedRow, Normalizer, Record, RecordError,
    RecordFilter, RecordResult,
};

pub use builder::{BuildReport, KgBuilder, RowOutcome, SkippedFile, SkippedRecord};

pub use dimension::{annotate, classify, properties_for, AnnotationSummary, Dimension};

pub use merge::{
    compose, compose_snapshots, compose_with, MergeError, MergeReport, MergeResult, Merger,
    SyntheticEdge,
};

pub use algo::{
    compute_metrics, largest_connected_component, lcc_subgraph, to_undirected_weighted,
    AnalysisOptions, AnalysisReport, Measure, MetricsReport, PathOutcome, ProjectedGraph,
};

pub use expansion::{expand, ExpansionReport, HopExpansion};

pub use enrich::{plan_requests, select_candidates, Enricher, EnrichmentConfig, EnrichmentReport, EnrichmentRequest};

pub use persistence::{load_graph, save_graph, PersistenceError, PersistenceResult, Snapshot};

pub use config::{ConfigError, PipelineConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
