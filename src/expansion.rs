//! Two-hop expansion around a seed entity
//!
//! Each degree-2 result row describes a path `seed -p1-> intermediate -p2->
//! target`. Rows carry either full URIs or short ids (`…_short` columns); an
//! optional `dimension` column overrides the predicate classification.

use crate::dimension::{classify_opt, Dimension};
use crate::graph::{EntityId, KnowledgeGraph, NodeType, PropertyId};
use crate::record::{parse_entity, parse_property, Record, RecordResult};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

/// Summary of an expansion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpansionReport {
    pub rows_seen: usize,
    pub rows_used: usize,
    /// Rows without a resolvable intermediate or target entity
    pub unresolvable: usize,
    pub failed: usize,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Folds two-hop rows into a graph centred on one seed
#[derive(Debug)]
pub struct HopExpansion {
    seed: EntityId,
    graph: KnowledgeGraph,
    report: ExpansionReport,
}

/// Value of `field`, or of `field_short` when the long form is empty
fn short_or_full<'r>(record: &'r Record, field: &str) -> &'r str {
    let full = record.get_value(field);
    if full.is_empty() {
        record.get_value(&format!("{}_short", field))
    } else {
        full
    }
}

fn hop_property(record: &Record, field: &str) -> (Option<PropertyId>, Option<String>) {
    let id = parse_property(short_or_full(record, field));
    let label = record.get_value(&format!("{}Label", field));
    let label = if label.is_empty() {
        id.as_ref().map(|p| p.as_str().to_string())
    } else {
        Some(label.to_string())
    };
    (id, label)
}

impl HopExpansion {
    pub fn new(seed: impl Into<EntityId>, seed_label: &str) -> Self {
        let seed = seed.into();
        let mut graph = KnowledgeGraph::new();
        let node = graph.ensure_node(seed.clone(), seed_label);
        node.node_type = NodeType::Central;
        node.dimension = Some(Dimension::Central);
        HopExpansion {
            seed,
            graph,
            report: ExpansionReport::default(),
        }
    }

    pub fn seed(&self) -> &EntityId {
        &self.seed
    }

    /// Fold one row. Returns false when the row has no usable path.
    pub fn process_row(&mut self, record: &Record) -> RecordResult<bool> {
        let intermediate = parse_entity(short_or_full(record, "entidadIntermedia"));
        let target = parse_entity(short_or_full(record, "entidadGrado2"));
        let (Some(intermediate), Some(target)) = (intermediate, target) else {
            return Ok(false);
        };

        let (p1, p1_label) = hop_property(record, "propiedadGrado1");
        let (p2, p2_label) = hop_property(record, "propiedadGrado2");
        let row_dimension = Dimension::parse(record.get_value("dimension")).filter(Dimension::is_applicable);
        let dim1 = row_dimension.or_else(|| classify_opt(p1.as_ref()));
        let dim2 = row_dimension.or_else(|| classify_opt(p2.as_ref()));

        let node = self
            .graph
            .ensure_node(intermediate.clone(), record.get_value("entidadIntermediaLabel"));
        node.fill_type(NodeType::Intermediate);
        node.fill_dimension(dim1);

        let node = self
            .graph
            .ensure_node(target.clone(), record.get_value("entidadGrado2Label"));
        node.fill_type(NodeType::Target);
        node.fill_dimension(dim2);

        let seed = self.seed.clone();
        self.graph.insert_edge(
            crate::graph::Edge::new(seed, intermediate.clone(), p1, p1_label).with_dimension(dim1),
        )?;
        self.graph.insert_edge(
            crate::graph::Edge::new(intermediate, target, p2, p2_label).with_dimension(dim2),
        )?;
        Ok(true)
    }

    pub fn extend<'a>(&mut self, rows: impl IntoIterator<Item = &'a JsonValue>) {
        for (i, value) in rows.into_iter().enumerate() {
            self.report.rows_seen += 1;
            let outcome = Record::from_json(value).and_then(|record| self.process_row(&record));
            match outcome {
                Ok(true) => self.report.rows_used += 1,
                Ok(false) => self.report.unresolvable += 1,
                Err(e) => {
                    warn!("Skipping expansion row {}: {}", i, e);
                    self.report.failed += 1;
                }
            }
        }
    }

    pub fn finish(mut self) -> (KnowledgeGraph, ExpansionReport) {
        self.graph.freeze_labels();
        self.report.node_count = self.graph.node_count();
        self.report.edge_count = self.graph.edge_count();
        info!(
            "Expanded {}: {} nodes, {} edges from {} rows",
            self.seed, self.report.node_count, self.report.edge_count, self.report.rows_seen
        );
        (self.graph, self.report)
    }
}

/// Build the two-hop graph of `seed` from raw rows
pub fn expand<'a>(
    seed: impl Into<EntityId>,
    seed_label: &str,
    rows: impl IntoIterator<Item = &'a JsonValue>,
) -> (KnowledgeGraph, ExpansionReport) {
    let mut expansion = HopExpansion::new(seed, seed_label);
    expansion.extend(rows);
    expansion.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::metrics::hop_distances;
    use serde_json::json;

    fn rows() -> Vec<JsonValue> {
        vec![
            json!({
                "propiedadGrado1": {"value": "http://www.wikidata.org/prop/direct/P131"},
                "entidadIntermedia": {"value": "http://www.wikidata.org/entity/Q5083"},
                "propiedadGrado2": {"value": "http://www.wikidata.org/prop/direct/P17"},
                "entidadGrado2": {"value": "http://www.wikidata.org/entity/Q419"},
                "entidadIntermediaLabel": {"value": "Cusco"},
                "entidadGrado2Label": {"value": "Perú"},
                "propiedadGrado1Label": {"value": "ubicado en"}
            }),
            json!({
                "propiedadGrado1_short": "P140",
                "entidadIntermedia_short": "Q9592",
                "propiedadGrado2_short": "P31",
                "entidadGrado2_short": "Q879146",
                "dimension": "Religioso"
            }),
            json!({"propiedadGrado1_short": "P31"}),
        ]
    }

    #[test]
    fn test_expansion_roles_and_dimensions() {
        let (graph, report) = expand("Q2408955", "Qoyllur Rit'i", &rows());

        assert_eq!(report.rows_used, 2);
        assert_eq!(report.unresolvable, 1);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 4);

        let seed = graph.get_node("Q2408955").unwrap();
        assert_eq!(seed.node_type, NodeType::Central);
        let cusco = graph.get_node("Q5083").unwrap();
        assert_eq!(cusco.node_type, NodeType::Intermediate);
        assert_eq!(cusco.dimension, Some(Dimension::Geographic));
        assert_eq!(cusco.label, "Cusco");

        // Row dimension overrides the classifier
        let target = graph.get_node("Q879146").unwrap();
        assert_eq!(target.node_type, NodeType::Target);
        assert_eq!(target.dimension, Some(Dimension::Religious));

        let first = &graph.edges()[0];
        assert_eq!(first.property_label.as_deref(), Some("ubicado en"));
        let second = &graph.edges()[1];
        assert_eq!(second.property_label.as_deref(), Some("P17"));
    }

    #[test]
    fn test_first_role_kept() {
        let rows = vec![
            json!({"entidadIntermedia_short": "Q1", "entidadGrado2_short": "Q2",
                   "propiedadGrado1_short": "P361", "propiedadGrado2_short": "P361"}),
            json!({"entidadIntermedia_short": "Q2", "entidadGrado2_short": "Q3",
                   "propiedadGrado1_short": "P361", "propiedadGrado2_short": "P361"}),
        ];
        let (graph, _) = expand("Q100", "", &rows);
        assert_eq!(graph.get_node("Q2").unwrap().node_type, NodeType::Target);
    }

    #[test]
    fn test_hop_distances_from_seed() {
        let (graph, _) = expand("Q2408955", "", &rows());
        let hops = hop_distances(&graph, "Q2408955");
        assert_eq!(hops["Q5083"], 1);
        assert_eq!(hops["Q419"], 2);
    }

    #[test]
    fn test_duplicate_rows_dedup() {
        let mut twice = rows();
        twice.extend(rows());
        let (graph, _) = expand("Q2408955", "", &twice);
        assert_eq!(graph.edge_count(), 4);
    }
}
