//! CSV export
//!
//! Node analysis table, per-dimension aggregates, and flat node/edge lists.
//! Fields are quoted when they contain a delimiter, quote or line break.

use super::PersistenceResult;
use crate::algo::{DimensionStats, NodeAnalysisRow};
use crate::graph::KnowledgeGraph;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line: Vec<Cow<'_, str>> = fields.iter().map(|f| escape(f)).collect();
    writeln!(out, "{}", line.join(","))
}

fn dimension_str(dim: Option<crate::dimension::Dimension>) -> &'static str {
    dim.map_or("N/A", |d| d.as_str())
}

pub fn write_node_analysis<W: Write>(out: &mut W, rows: &[NodeAnalysisRow]) -> std::io::Result<()> {
    write_row(
        out,
        &["id", "label", "type", "dimension", "degree_centrality", "betweenness", "degree", "is_main"],
    )?;
    for row in rows {
        write_row(
            out,
            &[
                row.id.as_str(),
                &row.label,
                row.node_type.as_str(),
                dimension_str(row.dimension),
                &format!("{:.6}", row.degree_centrality),
                &format!("{:.6}", row.betweenness),
                &row.degree.to_string(),
                if row.is_main { "true" } else { "false" },
            ],
        )?;
    }
    Ok(())
}

pub fn write_dimension_stats<W: Write>(out: &mut W, stats: &[DimensionStats]) -> std::io::Result<()> {
    write_row(
        out,
        &["dimension", "node_count", "mean_degree_centrality", "mean_betweenness", "mean_degree"],
    )?;
    for s in stats {
        write_row(
            out,
            &[
                s.dimension.as_str(),
                &s.node_count.to_string(),
                &format!("{:.6}", s.mean_degree_centrality),
                &format!("{:.6}", s.mean_betweenness),
                &format!("{:.4}", s.mean_degree),
            ],
        )?;
    }
    Ok(())
}

/// Node list: id, primary label, all labels (`|`-joined), type, dimension
pub fn write_nodes<W: Write>(out: &mut W, graph: &KnowledgeGraph) -> std::io::Result<()> {
    write_row(out, &["id", "label", "labels", "type", "dimension"])?;
    for node in graph.nodes() {
        let labels: Vec<&str> = node.labels.iter().map(String::as_str).collect();
        write_row(
            out,
            &[
                node.id.as_str(),
                &node.label,
                &labels.join("|"),
                node.node_type.as_str(),
                dimension_str(node.dimension),
            ],
        )?;
    }
    Ok(())
}

pub fn write_edges<W: Write>(out: &mut W, graph: &KnowledgeGraph) -> std::io::Result<()> {
    write_row(out, &["source", "target", "property_id", "property_label", "dimension"])?;
    for edge in graph.edges() {
        write_row(
            out,
            &[
                edge.source.as_str(),
                edge.target.as_str(),
                edge.property_id_str(),
                edge.property_label_str(),
                dimension_str(edge.dimension),
            ],
        )?;
    }
    Ok(())
}

fn to_file(path: &Path, write: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>) -> PersistenceResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}

pub fn export_node_analysis(rows: &[NodeAnalysisRow], path: impl AsRef<Path>) -> PersistenceResult<()> {
    to_file(path.as_ref(), |out| write_node_analysis(out, rows))
}

pub fn export_dimension_stats(stats: &[DimensionStats], path: impl AsRef<Path>) -> PersistenceResult<()> {
    to_file(path.as_ref(), |out| write_dimension_stats(out, stats))
}

pub fn export_nodes(graph: &KnowledgeGraph, path: impl AsRef<Path>) -> PersistenceResult<()> {
    to_file(path.as_ref(), |out| write_nodes(out, graph))
}

pub fn export_edges(graph: &KnowledgeGraph, path: impl AsRef<Path>) -> PersistenceResult<()> {
    to_file(path.as_ref(), |out| write_edges(out, graph))
}
