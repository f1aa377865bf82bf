//! Accumulated node properties
//!
//! A node property is keyed by the predicate label and holds every value seen
//! for it, in arrival order. Values are appended, never overwritten.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One observed value of a node property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyValue {
    pub value: String,
    #[serde(default)]
    pub value_label: String,
}

impl PropertyValue {
    pub fn new(value: impl Into<String>, value_label: impl Into<String>) -> Self {
        PropertyValue {
            value: value.into(),
            value_label: value_label.into(),
        }
    }
}

/// Property label → ordered values
pub type PropertyMap = IndexMap<String, Vec<PropertyValue>>;

/// Append every value of `other` onto `target`, key by key.
pub fn append_properties(target: &mut PropertyMap, other: &PropertyMap) {
    for (key, values) in other {
        target
            .entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
}
