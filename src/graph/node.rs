//! Node implementation for the knowledge graph
//!
//! A node stands for one real-world entity. Its id never changes; meeting the
//! same id again merges attributes into the existing node.

use super::property::{append_properties, PropertyMap, PropertyValue};
use super::types::{EntityId, NodeType};
use crate::dimension::Dimension;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node in the knowledge graph
///
/// Nodes have:
/// - A canonical entity id
/// - A primary label plus the set of every label seen across sources
/// - The role assigned by the traversal that produced it
/// - An optional analytic dimension
/// - Accumulated properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Canonical identifier for this node
    pub id: EntityId,

    /// Primary display label (lexicographically smallest of `labels`)
    #[serde(default)]
    pub label: String,

    /// Every label seen for this node, sorted
    #[serde(default)]
    pub labels: BTreeSet<String>,

    /// Role assigned by the producing traversal
    #[serde(default, rename = "type")]
    pub node_type: NodeType,

    /// Analytic dimension, if classified
    #[serde(default)]
    pub dimension: Option<Dimension>,

    /// Accumulated properties
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Node {
    /// Create a bare node with no labels
    pub fn new(id: impl Into<EntityId>) -> Self {
        Node {
            id: id.into(),
            label: String::new(),
            labels: BTreeSet::new(),
            node_type: NodeType::Unknown,
            dimension: None,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Add a label. Empty labels are ignored. Returns true if the label was new.
    pub fn add_label(&mut self, label: &str) -> bool {
        if label.is_empty() {
            return false;
        }
        let added = self.labels.insert(label.to_string());
        if added && (self.label.is_empty() || label < self.label.as_str()) {
            self.label = label.to_string();
        }
        added
    }

    /// Check if node carries a specific label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Get number of labels
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Re-derive the primary label from the label set
    pub fn freeze_labels(&mut self) {
        self.label = self.labels.iter().next().cloned().unwrap_or_default();
    }

    /// Label to show, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            self.id.as_str()
        } else {
            &self.label
        }
    }

    /// Append a property value
    pub fn push_property(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.properties.entry(key.into()).or_default().push(value);
    }

    /// Set the node type unless one is already assigned
    pub fn fill_type(&mut self, node_type: NodeType) {
        if self.node_type.is_unknown() {
            self.node_type = node_type;
        }
    }

    /// Set the dimension unless one is already assigned
    pub fn fill_dimension(&mut self, dimension: Option<Dimension>) {
        if self.dimension.is_none() {
            self.dimension = dimension;
        }
    }

    /// Merge another record of the same entity into this node.
    ///
    /// Labels are unioned and properties appended. `node_type` and
    /// `dimension` keep this node's value and take `other`'s only where this
    /// node has none.
    pub fn merge_from(&mut self, other: &Node) {
        debug_assert_eq!(self.id, other.id);
        for label in &other.labels {
            self.add_label(label);
        }
        append_properties(&mut self.properties, &other.properties);
        self.fill_type(other.node_type);
        self.fill_dimension(other.dimension);
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_bare() {
        let node = Node::new("Q1");
        assert_eq!(node.id.as_str(), "Q1");
        assert_eq!(node.label, "");
        assert_eq!(node.label_count(), 0);
        assert!(node.node_type.is_unknown());
        assert_eq!(node.display_name(), "Q1");
    }

    #[test]
    fn test_add_label_is_idempotent() {
        let mut node = Node::new("Q1");
        assert!(node.add_label("Qoyllur Rit'i"));
        assert!(!node.add_label("Qoyllur Rit'i"));
        assert!(!node.add_label(""));
        assert_eq!(node.label_count(), 1);
        assert!(node.has_label("Qoyllur Rit'i"));
    }

    #[test]
    fn test_primary_label_is_smallest() {
        let mut node = Node::new("Q1");
        node.add_label("B");
        node.add_label("A");
        node.add_label("C");
        assert_eq!(node.label, "A");

        node.label.clear();
        node.freeze_labels();
        assert_eq!(node.label, "A");
        assert_eq!(node.labels.iter().cloned().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_merge_from_first_value_wins() {
        let mut a = Node::new("Q1").with_type(NodeType::Central);
        a.add_label("A");
        let mut b = Node::new("Q1")
            .with_type(NodeType::Target)
            .with_dimension(Dimension::Geographic);
        b.add_label("B");
        b.push_property("país", PropertyValue::new("Q419", "Perú"));

        a.merge_from(&b);

        assert_eq!(a.node_type, NodeType::Central);
        assert_eq!(a.dimension, Some(Dimension::Geographic));
        assert_eq!(a.label_count(), 2);
        assert_eq!(a.properties["país"].len(), 1);
    }

    #[test]
    fn test_node_equality_by_id() {
        let mut a = Node::new("Q7");
        a.add_label("x");
        let b = Node::new("Q7");
        assert_eq!(a, b);
        assert_ne!(a, Node::new("Q8"));
    }
}
