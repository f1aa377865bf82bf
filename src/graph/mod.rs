//! Knowledge graph data model
//!
//! This module implements the merged node/edge model:
//! - Nodes keyed by canonical entity id, with label sets and accumulated properties
//! - Directed, deduplicated edges carrying a predicate
//! - Multiple distinct predicates between the same pair of nodes

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Edge, EdgeKey, PredicateKey};
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStatistics, KnowledgeGraph};
pub use types::{EntityId, NodeType, PropertyId};
