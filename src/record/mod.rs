//! Tabular record input
//!
//! Records arrive as mappings from query variable to binding. This module
//! parses them, extracts identifiers from URIs and resolves the
//! subject/predicate/object roles.

pub mod filter;
pub mod identifier;
pub mod loader;
pub mod normalizer;
pub mod value;

pub use filter::RecordFilter;
pub use identifier::{
    extract_identifier, extract_pid, extract_qid, parse_entity, parse_property, IdentifierKind,
};
pub use loader::{load_records, parse_records, records_from_document};
pub use normalizer::{FieldRule, LiteralValue, NormalizedRow, Normalizer};
pub use value::{BindingValue, Record};

use std::path::PathBuf;
use thiserror::Error;

/// Record errors
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record is a JSON {0}, expected an object")]
    NotAnObject(&'static str),

    #[error("Graph error: {0}")]
    Graph(#[from] crate::graph::GraphError),
}

pub type RecordResult<T> = Result<T, RecordError>;
