//! Enrichment planning
//!
//! Picks well-connected, classified nodes, groups them per dimension with the
//! predicates worth querying for that dimension, and absorbs the returned
//! rows as `enriched` nodes. Issuing the queries is left to the caller.

use crate::algo::NodeAnalysisRow;
use crate::dimension::{properties_for, Dimension};
use crate::graph::{Edge, EntityId, KnowledgeGraph, NodeType};
use crate::record::{parse_entity, parse_property, Record, RecordResult};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Ids too generic to be worth adding
pub const DEFAULT_EXCLUDED: &[&str] = &["Q1", "Q2", "Q3", "Q4", "Q5", "Q15", "Q16", "Q17", "Q18", "Q20", "Q30"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Minimum degree centrality for a classified node
    pub centrality_threshold: f64,
    /// Minimum degree centrality for an intermediate node
    pub intermediate_threshold: f64,
    pub max_nodes_per_query: usize,
    /// Ids this short or shorter are treated as generic
    pub max_generic_id_len: usize,
    pub excluded: BTreeSet<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        EnrichmentConfig {
            centrality_threshold: 0.01,
            intermediate_threshold: 0.05,
            max_nodes_per_query: 15,
            max_generic_id_len: 3,
            excluded: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A node selected for deepening
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: EntityId,
    pub dimension: Option<Dimension>,
    pub degree_centrality: f64,
}

/// One query to issue: these nodes, these predicates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentRequest {
    pub dimension: Dimension,
    pub nodes: Vec<EntityId>,
    pub properties: Vec<&'static str>,
}

/// Select candidates from an analysis table, in table order.
///
/// A node qualifies with a defined dimension and degree centrality above
/// `centrality_threshold`, or as an intermediate node above
/// `intermediate_threshold`. Each node is selected once.
pub fn select_candidates(rows: &[NodeAnalysisRow], config: &EnrichmentConfig) -> Vec<Candidate> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    let classified = rows.iter().filter(|r| {
        r.degree_centrality > config.centrality_threshold
            && r.dimension.is_some_and(|d| d.is_applicable())
    });
    let intermediate = rows.iter().filter(|r| {
        r.node_type == NodeType::Intermediate && r.degree_centrality > config.intermediate_threshold
    });
    for row in classified.chain(intermediate) {
        if seen.insert(row.id.clone()) {
            out.push(Candidate {
                id: row.id.clone(),
                dimension: row.dimension,
                degree_centrality: row.degree_centrality,
            });
        }
    }
    debug!("Selected {} enrichment candidates", out.len());
    out
}

/// Group candidates per dimension. Dimensions without predicates to query are
/// skipped; each request holds at most `max_nodes_per_query` nodes.
pub fn plan_requests(candidates: &[Candidate], config: &EnrichmentConfig) -> Vec<EnrichmentRequest> {
    let mut groups: BTreeMap<Dimension, Vec<EntityId>> = BTreeMap::new();
    for c in candidates {
        if let Some(dim) = c.dimension {
            groups.entry(dim).or_default().push(c.id.clone());
        }
    }
    groups
        .into_iter()
        .filter_map(|(dimension, mut nodes)| {
            let properties = properties_for(dimension);
            if properties.is_empty() {
                debug!("No predicates to query for dimension {}", dimension);
                return None;
            }
            nodes.truncate(config.max_nodes_per_query);
            Some(EnrichmentRequest {
                dimension,
                nodes,
                properties: properties.to_vec(),
            })
        })
        .collect()
}

/// Outcome of absorbing enrichment rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentReport {
    pub rows_seen: usize,
    pub nodes_added: usize,
    pub edges_added: usize,
    pub skipped_existing: usize,
    pub skipped_excluded: usize,
    pub skipped_generic: usize,
    /// Rows whose origin or target could not be resolved, or whose origin is
    /// not in the graph
    pub unresolved: usize,
    pub failed: usize,
}

/// Absorbs enrichment result rows into a graph
pub struct Enricher<'g> {
    graph: &'g mut KnowledgeGraph,
    config: &'g EnrichmentConfig,
    report: EnrichmentReport,
}

impl<'g> Enricher<'g> {
    pub fn new(graph: &'g mut KnowledgeGraph, config: &'g EnrichmentConfig) -> Self {
        Enricher {
            graph,
            config,
            report: EnrichmentReport::default(),
        }
    }

    fn is_generic(&self, id: &EntityId) -> bool {
        id.as_str().trim().chars().count() <= self.config.max_generic_id_len
    }

    /// Absorb one row with fields `nodoOrigen`, `propiedad`, `nodoDestino`
    /// and their labels. The row's dimension is `dimension` unless the row
    /// names one.
    pub fn absorb(&mut self, record: &Record, dimension: Option<Dimension>) -> RecordResult<()> {
        self.report.rows_seen += 1;
        let origin = parse_entity(record.get_value("nodoOrigen"));
        let target = parse_entity(record.get_value("nodoDestino"));
        let (Some(origin), Some(target)) = (origin, target) else {
            self.report.unresolved += 1;
            return Ok(());
        };
        if !self.graph.contains_node(origin.as_str()) {
            self.report.unresolved += 1;
            return Ok(());
        }
        if self.config.excluded.contains(target.as_str()) {
            self.report.skipped_excluded += 1;
            return Ok(());
        }
        if self.is_generic(&target) {
            self.report.skipped_generic += 1;
            return Ok(());
        }

        let dimension = Dimension::parse(record.get_value("dimension")).or(dimension);
        if self.graph.contains_node(target.as_str()) {
            self.report.skipped_existing += 1;
        } else {
            let node = self
                .graph
                .ensure_node(target.clone(), record.get_value("nodoDestinoLabel"));
            node.node_type = NodeType::Enriched;
            node.dimension = dimension.filter(Dimension::is_applicable);
            self.report.nodes_added += 1;
        }

        let property_id = parse_property(record.get_value("propiedad"));
        let label = record.get_value("propiedadLabel");
        let label = if label.is_empty() {
            property_id.as_ref().map(|p| p.as_str().to_string())
        } else {
            Some(label.to_string())
        };
        let edge = Edge::new(origin, target, property_id, label)
            .with_dimension(dimension.filter(Dimension::is_applicable));
        if self.graph.insert_edge(edge)? {
            self.report.edges_added += 1;
        }
        Ok(())
    }

    pub fn absorb_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a JsonValue>, dimension: Option<Dimension>) {
        for (i, value) in rows.into_iter().enumerate() {
            let outcome = match Record::from_json(value) {
                Ok(record) => self.absorb(&record, dimension),
                Err(e) => {
                    // absorb() never saw this row
                    self.report.rows_seen += 1;
                    Err(e)
                }
            };
            if let Err(e) = outcome {
                warn!("Skipping enrichment row {}: {}", i, e);
                self.report.failed += 1;
            }
        }
    }

    pub fn finish(self) -> EnrichmentReport {
        self.graph.freeze_labels();
        info!(
            "Enrichment added {} nodes and {} edges ({} existing, {} excluded, {} generic)",
            self.report.nodes_added,
            self.report.edges_added,
            self.report.skipped_existing,
            self.report.skipped_excluded,
            self.report.skipped_generic
        );
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, dim: Option<Dimension>, ty: NodeType, dc: f64) -> NodeAnalysisRow {
        NodeAnalysisRow {
            id: EntityId::new(id),
            label: id.to_string(),
            node_type: ty,
            dimension: dim,
            degree_centrality: dc,
            betweenness: 0.0,
            degree: 0,
            is_main: false,
        }
    }

    #[test]
    fn test_select_candidates() {
        let rows = vec![
            row("Q10", Some(Dimension::Geographic), NodeType::Target, 0.2),
            row("Q11", None, NodeType::Target, 0.5),
            row("Q12", Some(Dimension::NotApplicable), NodeType::Target, 0.5),
            row("Q13", Some(Dimension::Religious), NodeType::Intermediate, 0.1),
            row("Q14", None, NodeType::Intermediate, 0.06),
            row("Q15", Some(Dimension::Cultural), NodeType::Target, 0.005),
        ];
        let ids: Vec<String> = select_candidates(&rows, &EnrichmentConfig::default())
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["Q10", "Q13", "Q14"]);
    }

    #[test]
    fn test_plan_requests_caps_and_skips() {
        let config = EnrichmentConfig {
            max_nodes_per_query: 2,
            ..Default::default()
        };
        let mut candidates: Vec<Candidate> = (0..5)
            .map(|i| Candidate {
                id: EntityId::new(format!("Q10{}", i)),
                dimension: Some(Dimension::Geographic),
                degree_centrality: 0.1,
            })
            .collect();
        candidates.push(Candidate {
            id: EntityId::new("Q999"),
            dimension: Some(Dimension::Relational),
            degree_centrality: 0.1,
        });
        candidates.push(Candidate {
            id: EntityId::new("Q998"),
            dimension: None,
            degree_centrality: 0.1,
        });

        let requests = plan_requests(&candidates, &config);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].dimension, Dimension::Geographic);
        assert_eq!(requests[0].nodes.len(), 2);
        assert!(requests[0].properties.contains(&"P131"));
    }

    #[test]
    fn test_absorb_rows() {
        let mut graph = KnowledgeGraph::new();
        graph.ensure_node("Q5083", "Cusco");
        graph.ensure_node("Q419", "Perú");
        let config = EnrichmentConfig::default();

        let rows = vec![
            json!({"nodoOrigen": "http://www.wikidata.org/entity/Q5083",
                   "propiedad": "http://www.wikidata.org/prop/direct/P131",
                   "nodoDestino": "http://www.wikidata.org/entity/Q2868",
                   "nodoDestinoLabel": "provincia del Cusco",
                   "propiedadLabel": "ubicado en"}),
            json!({"nodoOrigen": "http://www.wikidata.org/entity/Q5083",
                   "propiedad": "http://www.wikidata.org/prop/direct/P17",
                   "nodoDestino": "http://www.wikidata.org/entity/Q419"}),
            json!({"nodoOrigen": "http://www.wikidata.org/entity/Q5083",
                   "nodoDestino": "http://www.wikidata.org/entity/Q30"}),
            json!({"nodoOrigen": "http://www.wikidata.org/entity/Q5083",
                   "nodoDestino": "http://www.wikidata.org/entity/Q99"}),
            json!({"nodoOrigen": "http://www.wikidata.org/entity/Q777777",
                   "nodoDestino": "http://www.wikidata.org/entity/Q888888"}),
            json!([1]),
        ];

        let mut enricher = Enricher::new(&mut graph, &config);
        enricher.absorb_all(&rows, Some(Dimension::Geographic));
        let report = enricher.finish();

        assert_eq!(report.rows_seen, 6);
        assert_eq!(report.nodes_added, 1);
        assert_eq!(report.edges_added, 2);
        assert_eq!(report.skipped_existing, 1);
        assert_eq!(report.skipped_excluded, 1);
        assert_eq!(report.skipped_generic, 1);
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.failed, 1);

        let added = graph.get_node("Q2868").unwrap();
        assert_eq!(added.node_type, NodeType::Enriched);
        assert_eq!(added.dimension, Some(Dimension::Geographic));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges()[1].property_label.as_deref(), Some("P17"));
    }
}
