//! Record file loading
//!
//! Accepts query-service result documents (`{"results":{"bindings":[...]}}`),
//! bare JSON lists of records, or a single record object.

use super::{RecordError, RecordResult};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Split a parsed document into raw records (not yet validated)
pub fn records_from_document(document: JsonValue) -> Vec<JsonValue> {
    match document {
        JsonValue::Object(mut map) => {
            let bindings = map
                .get_mut("results")
                .and_then(|r| r.get_mut("bindings"))
                .filter(|b| b.is_array())
                .map(JsonValue::take);
            match bindings {
                Some(JsonValue::Array(rows)) => rows,
                _ => vec![JsonValue::Object(map)],
            }
        }
        JsonValue::Array(rows) => rows,
        other => vec![other],
    }
}

/// Parse a JSON string into raw records
pub fn parse_records(text: &str) -> RecordResult<Vec<JsonValue>> {
    let document: JsonValue = serde_json::from_str(text)?;
    Ok(records_from_document(document))
}

/// Read raw records from a JSON file
pub fn load_records(path: impl AsRef<Path>) -> RecordResult<Vec<JsonValue>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&text).map_err(|e| match e {
        RecordError::Json(source) => RecordError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
