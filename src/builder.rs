//! Knowledge graph builder
//!
//! Folds result records into one [`KnowledgeGraph`]. Dedup state and
//! counters belong to the builder instance; nothing is shared between
//! builds.

use crate::graph::{KnowledgeGraph, PropertyValue};
use crate::record::{Normalizer, Record, RecordResult};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};
use std::path::{Path, PathBuf};

/// What one record contributed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Subject and object resolved; `added` is false for a duplicate edge
    Edge { added: bool },
    /// Subject resolved, no entity object
    NodeOnly,
    /// No subject could be resolved
    Unresolvable,
}

/// A record that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    /// Position in the input sequence
    pub index: usize,
    pub reason: String,
}

/// A record file that could not be loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a build
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub records_seen: usize,
    pub records_processed: usize,
    pub unresolvable: usize,
    pub node_only: usize,
    pub edges_added: usize,
    pub duplicate_edges: usize,
    pub failed: Vec<SkippedRecord>,
    pub failed_files: Vec<SkippedFile>,
    pub node_count: usize,
    pub edge_count: usize,
}

impl BuildReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    fn record(&mut self, outcome: RowOutcome) {
        self.records_processed += 1;
        match outcome {
            RowOutcome::Edge { added: true } => self.edges_added += 1,
            RowOutcome::Edge { added: false } => self.duplicate_edges += 1,
            RowOutcome::NodeOnly => self.node_only += 1,
            RowOutcome::Unresolvable => self.unresolvable += 1,
        }
    }
}

/// Builds a graph from result records
#[derive(Debug, Default)]
pub struct KgBuilder {
    graph: KnowledgeGraph,
    normalizer: Normalizer,
    report: BuildReport,
}

impl KgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        KgBuilder {
            normalizer,
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Fold one record into the graph.
    ///
    /// Literal objects become properties of the subject, keyed by the
    /// predicate label.
    pub fn process_row(&mut self, record: &Record) -> RecordResult<RowOutcome> {
        let Some(row) = self.normalizer.normalize(record) else {
            return Ok(RowOutcome::Unresolvable);
        };

        let subject = self.graph.ensure_node(row.subject.clone(), &row.subject_label);
        if let (Some(literal), Some(key)) = (&row.literal, &row.predicate_label) {
            subject.push_property(
                key.clone(),
                PropertyValue::new(literal.value.clone(), literal.value_label.clone()),
            );
        }

        let Some(object) = row.object else {
            return Ok(RowOutcome::NodeOnly);
        };
        self.graph.ensure_node(object.clone(), &row.object_label);
        let added = self.graph.add_edge(
            row.subject.as_str(),
            object.as_str(),
            row.predicate_id,
            row.predicate_label,
        )?;
        Ok(RowOutcome::Edge { added })
    }

    /// Fold one raw JSON record
    pub fn process_json(&mut self, value: &JsonValue) -> RecordResult<RowOutcome> {
        let record = Record::from_json(value)?;
        self.process_row(&record)
    }

    /// Fold a batch of raw records. A failing record is logged and counted;
    /// the batch continues.
    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a JsonValue>) {
        for value in records {
            let index = self.report.records_seen;
            self.report.records_seen += 1;
            match self.process_json(value) {
                Ok(outcome) => self.report.record(outcome),
                Err(e) => {
                    warn!("Skipping record {}: {}", index, e);
                    self.report.failed.push(SkippedRecord {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    /// Fold parsed records
    pub fn extend_records<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) {
        for record in records {
            let index = self.report.records_seen;
            self.report.records_seen += 1;
            match self.process_row(record) {
                Ok(outcome) => self.report.record(outcome),
                Err(e) => {
                    warn!("Skipping record {}: {}", index, e);
                    self.report.failed.push(SkippedRecord {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    /// Freeze labels and hand over the graph with its report
    pub fn finish(mut self) -> (KnowledgeGraph, BuildReport) {
        self.graph.freeze_labels();
        self.report.node_count = self.graph.node_count();
        self.report.edge_count = self.graph.edge_count();
        info!(
            "Built graph: {} nodes, {} edges ({} records, {} unresolvable, {} failed, {} duplicate edges, {} unreadable files)",
            self.report.node_count,
            self.report.edge_count,
            self.report.records_seen,
            self.report.unresolvable,
            self.report.failed.len(),
            self.report.duplicate_edges,
            self.report.failed_files.len()
        );
        (self.graph, self.report)
    }

    /// Build a graph from raw JSON records
    pub fn build<'a>(records: impl IntoIterator<Item = &'a JsonValue>) -> (KnowledgeGraph, BuildReport) {
        let mut builder = KgBuilder::new();
        builder.extend(records);
        builder.finish()
    }

    /// Fold one record file. A file that cannot be read or parsed is
    /// logged and listed in the report; its records are skipped.
    pub fn extend_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match crate::record::load_records(path) {
            Ok(records) => {
                debug!("Folding {} records from {}", records.len(), path.display());
                self.extend(&records);
            }
            Err(e) => {
                warn!("Skipping record file {}: {}", path.display(), e);
                self.report.failed_files.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Build from several record files
    pub fn build_files<P: AsRef<Path>>(paths: &[P]) -> (KnowledgeGraph, BuildReport) {
        let mut builder = KgBuilder::new();
        for path in paths {
            builder.extend_file(path);
        }
        builder.finish()
    }
}
