//! Dimension classifier
//!
//! Maps a predicate identifier to the analytic category it belongs to. The
//! table is static configuration; unknown predicates classify as
//! [`Dimension::NotApplicable`].

use crate::graph::{KnowledgeGraph, PropertyId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Semantic category of a predicate, node or edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Identity,
    Geographic,
    Temporal,
    Cultural,
    Digital,
    Social,
    Heritage,
    Religious,
    Economic,
    Artistic,
    /// Seed entity of a traversal
    Central,
    /// Manually asserted cross-graph relation
    Relational,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Identity => "Identity",
            Dimension::Geographic => "Geographic",
            Dimension::Temporal => "Temporal",
            Dimension::Cultural => "Cultural",
            Dimension::Digital => "Digital",
            Dimension::Social => "Social",
            Dimension::Heritage => "Heritage",
            Dimension::Religious => "Religious",
            Dimension::Economic => "Economic",
            Dimension::Artistic => "Artistic",
            Dimension::Central => "Central",
            Dimension::Relational => "Relational",
            Dimension::NotApplicable => "N/A",
        }
    }

    /// Parse a dimension name. Accepts the English names used here and the
    /// Spanish names found in older result files.
    pub fn parse(name: &str) -> Option<Self> {
        let dim = match name.trim() {
            "Identity" | "Identidad" => Dimension::Identity,
            "Geographic" | "Geográfica" | "Geografica" => Dimension::Geographic,
            "Temporal" => Dimension::Temporal,
            "Cultural" => Dimension::Cultural,
            "Digital" => Dimension::Digital,
            "Social" => Dimension::Social,
            "Heritage" | "Patrimonio" => Dimension::Heritage,
            "Religious" | "Religioso" => Dimension::Religious,
            "Economic" | "Económica" | "Economica" => Dimension::Economic,
            "Artistic" | "Artística" | "Artistica" => Dimension::Artistic,
            "Central" => Dimension::Central,
            "Relational" | "Relacional" => Dimension::Relational,
            "N/A" => Dimension::NotApplicable,
            _ => return None,
        };
        Some(dim)
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, Dimension::NotApplicable)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DIMENSION_TABLE: &[(&str, Dimension)] = &[
    ("P17", Dimension::Geographic),
    ("P131", Dimension::Geographic),
    ("P276", Dimension::Geographic),
    ("P625", Dimension::Geographic),
    ("P135", Dimension::Cultural),
    ("P361", Dimension::Cultural),
    ("P921", Dimension::Cultural),
    ("P136", Dimension::Cultural),
    ("P31", Dimension::Identity),
    ("P495", Dimension::Identity),
    ("P1435", Dimension::Heritage),
    ("P2184", Dimension::Heritage),
    ("P8415", Dimension::Heritage),
    ("P571", Dimension::Temporal),
    ("P585", Dimension::Temporal),
    ("P580", Dimension::Temporal),
    ("P112", Dimension::Social),
    ("P710", Dimension::Social),
    ("P127", Dimension::Social),
    ("P140", Dimension::Religious),
    ("P417", Dimension::Religious),
    ("P2925", Dimension::Religious),
    ("P18", Dimension::Digital),
    ("P856", Dimension::Digital),
    ("P953", Dimension::Digital),
    ("P2139", Dimension::Economic),
    ("P2130", Dimension::Economic),
    ("P170", Dimension::Artistic),
    ("P86", Dimension::Artistic),
];

/// Classify a predicate identifier.
pub fn classify(property_id: &str) -> Dimension {
    DIMENSION_TABLE
        .iter()
        .find(|(pid, _)| *pid == property_id)
        .map(|(_, dim)| *dim)
        .unwrap_or(Dimension::NotApplicable)
}

/// Classify an optional predicate, mapping the sentinel to `None`.
pub fn classify_opt(property_id: Option<&PropertyId>) -> Option<Dimension> {
    property_id
        .map(|pid| classify(pid.as_str()))
        .filter(Dimension::is_applicable)
}

/// Predicates worth querying when deepening nodes of a dimension.
pub fn properties_for(dimension: Dimension) -> &'static [&'static str] {
    match dimension {
        Dimension::Cultural => &["P135", "P361", "P921", "P136"],
        Dimension::Religious => &["P140", "P417", "P2925"],
        Dimension::Heritage => &["P1435", "P2184"],
        Dimension::Temporal => &["P571", "P585", "P580"],
        Dimension::Digital => &["P18", "P856", "P953"],
        Dimension::Social => &["P112", "P710", "P127"],
        Dimension::Geographic => &["P131", "P276", "P625", "P17"],
        Dimension::Identity => &["P31", "P17", "P495"],
        Dimension::Economic => &["P2139", "P2130"],
        Dimension::Artistic => &["P170", "P86"],
        Dimension::Central | Dimension::Relational | Dimension::NotApplicable => &[],
    }
}

/// Outcome of an annotation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationSummary {
    pub edges_annotated: usize,
    pub nodes_annotated: usize,
    /// Nodes per dimension after the pass; `N/A` collects unclassified nodes
    pub nodes_per_dimension: BTreeMap<Dimension, usize>,
}

/// Fill missing dimensions on edges and nodes.
///
/// Edges take the classification of their predicate. A node without a
/// dimension takes the dimension of the first classified edge pointing at it,
/// in edge order. Existing values are left alone.
pub fn annotate(graph: &mut KnowledgeGraph) -> AnnotationSummary {
    let mut summary = AnnotationSummary::default();
    let mut inherited: Vec<(crate::graph::EntityId, Dimension)> = Vec::new();

    for edge in graph.edges_mut() {
        if edge.dimension.is_none() {
            if let Some(dim) = classify_opt(edge.property_id.as_ref()) {
                edge.dimension = Some(dim);
                summary.edges_annotated += 1;
            }
        }
        if let Some(dim) = edge.dimension {
            inherited.push((edge.target.clone(), dim));
        }
    }

    for (target, dim) in inherited {
        if let Some(node) = graph.get_node_mut(target.as_str()) {
            if node.dimension.is_none() {
                node.dimension = Some(dim);
                summary.nodes_annotated += 1;
            }
        }
    }

    for node in graph.nodes() {
        let dim = node.dimension.unwrap_or(Dimension::NotApplicable);
        *summary.nodes_per_dimension.entry(dim).or_insert(0) += 1;
    }

    debug!(
        edges = summary.edges_annotated,
        nodes = summary.nodes_annotated,
        "dimension annotation complete"
    );
    summary
}
