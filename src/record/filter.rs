//! Record relevance filter
//!
//! Keeps records whose `tipo` is one of a set of relevant entity types, or
//! whose label/description mentions a keyword.

use super::identifier::last_segment;
use super::value::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Festivity-related entity types
pub const DEFAULT_RELEVANT_TYPES: &[&str] = &["Q200538", "Q375011", "Q4579447", "Q131036", "Q20203314"];

/// Keywords in Spanish, Quechua and English
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "fiesta",
    "festividad",
    "danza",
    "peregrinación",
    "carnaval",
    "celebración",
    "rito",
    "tradición",
    "patronal",
    "virgen",
    "señor",
    "santo",
    "carmen",
    "qoyllur",
    "raymi",
    "festival",
    "feast",
    "celebration",
    "pilgrimage",
    "dance",
    "ritual",
    "tradition",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub relevant_types: BTreeSet<String>,
    /// Matched case-insensitively
    pub keywords: Vec<String>,
}

impl Default for RecordFilter {
    fn default() -> Self {
        RecordFilter {
            relevant_types: DEFAULT_RELEVANT_TYPES.iter().map(|s| s.to_string()).collect(),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        let tipo = record.get_value("tipo");
        if !tipo.is_empty() && self.relevant_types.contains(last_segment(tipo)) {
            return true;
        }

        let text = format!(
            "{} {}",
            record.get_value("itemLabel"),
            record.get_value("itemDescription")
        )
        .to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
    }

    /// Keep matching records, in order
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a Record> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
