//! Edge implementation for the knowledge graph
//!
//! Edges are directed predicate instances. Two edges with the same
//! `(source, target, property_id, property_label)` are the same edge; distinct
//! predicates between one pair are distinct edges.

use super::types::{EntityId, PropertyId};
use crate::dimension::Dimension;
use serde::{Deserialize, Serialize};

/// A directed edge in the knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node (edge goes FROM this node)
    pub source: EntityId,

    /// Target node (edge goes TO this node)
    pub target: EntityId,

    /// Predicate identifier
    #[serde(default)]
    pub property_id: Option<PropertyId>,

    /// Predicate display label
    #[serde(default)]
    pub property_label: Option<String>,

    /// Analytic dimension of the predicate
    #[serde(default)]
    pub dimension: Option<Dimension>,
}

/// Deduplication key of an edge. Absent predicate fields compare as empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: EntityId,
    pub target: EntityId,
    pub property_id: String,
    pub property_label: String,
}

/// Frequency key for predicate reporting
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PredicateKey {
    pub property_id: String,
    pub property_label: String,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        property_id: Option<PropertyId>,
        property_label: Option<String>,
    ) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
            property_id,
            property_label,
            dimension: None,
        }
    }

    pub fn with_dimension(mut self, dimension: Option<Dimension>) -> Self {
        self.dimension = dimension;
        self
    }

    /// Deduplication key
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source.clone(),
            target: self.target.clone(),
            property_id: self.property_id_str().to_string(),
            property_label: self.property_label_str().to_string(),
        }
    }

    /// Predicate frequency key
    pub fn predicate_key(&self) -> PredicateKey {
        PredicateKey {
            property_id: self.property_id_str().to_string(),
            property_label: self.property_label_str().to_string(),
        }
    }

    pub fn property_id_str(&self) -> &str {
        self.property_id.as_ref().map_or("", PropertyId::as_str)
    }

    pub fn property_label_str(&self) -> &str {
        self.property_label.as_deref().unwrap_or("")
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_treats_none_as_empty() {
        let a = Edge::new("Q1", "Q2", None, None);
        let b = Edge::new("Q1", "Q2", Some(PropertyId::new("")), Some(String::new()));
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_distinct_predicates_distinct_keys() {
        let a = Edge::new("Q1", "Q2", Some("P31".into()), Some("instancia de".into()));
        let b = Edge::new("Q1", "Q2", Some("P361".into()), Some("parte de".into()));
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_direction_matters_for_key() {
        let a = Edge::new("Q1", "Q2", Some("P31".into()), None);
        let b = Edge::new("Q2", "Q1", Some("P31".into()), None);
        assert_ne!(a.key(), b.key());
        assert!(!a.is_self_loop());
        assert!(Edge::new("Q1", "Q1", None, None).is_self_loop());
    }
}
