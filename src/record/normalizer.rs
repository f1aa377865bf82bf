//! Record normalization
//!
//! Result files from different queries name the same logical roles
//! differently (`item` vs `festividad` vs `subject` ...). Each role is
//! resolved by an ordered list of [`FieldRule`]s; the first rule that yields
//! an identifier wins. Rule order follows how often each convention appears
//! in practice and must stay stable for reproducible output.

use super::identifier::{extract_pid, extract_qid};
use super::value::Record;
use crate::graph::{EntityId, PropertyId};

/// Accessor for one identifier-carrying field and its label companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub label_field: &'static str,
}

impl FieldRule {
    pub const fn new(field: &'static str, label_field: &'static str) -> Self {
        FieldRule { field, label_field }
    }

    /// Entity id carried by this rule's field
    pub fn entity(&self, record: &Record) -> Option<EntityId> {
        extract_qid(record.get_value(self.field))
    }

    pub fn label<'r>(&self, record: &'r Record) -> &'r str {
        record.get_value(self.label_field)
    }
}

/// Subject rules, highest priority first
pub const SUBJECT_RULES: &[FieldRule] = &[
    FieldRule::new("item", "itemLabel"),
    FieldRule::new("item1", "item1Label"),
    FieldRule::new("festividad", "festividadLabel"),
    FieldRule::new("subject", "subjectLabel"),
    FieldRule::new("adminArea", "adminAreaLabel"),
];

/// Object fields promoted to subject when no subject rule matches
pub const SUBJECT_FALLBACK_RULES: &[FieldRule] = &[
    FieldRule::new("item2", "item2Label"),
    FieldRule::new("valor", "valorLabel"),
    FieldRule::new("entidadIntermedia", "entidadIntermediaLabel"),
];

/// Object rules, highest priority first
pub const OBJECT_RULES: &[FieldRule] = &[
    FieldRule::new("item2", "item2Label"),
    FieldRule::new("valor", "valorLabel"),
    FieldRule::new("entidadIntermedia", "entidadIntermediaLabel"),
    FieldRule::new("o", "ol_"),
];

/// Predicate id fields
pub const PREDICATE_FIELDS: &[&str] = &["propiedad", "p"];

/// Predicate label fields; the predicate id is the last resort
pub const PREDICATE_LABEL_FIELDS: &[&str] = &["propiedadLabel", "pl_"];

/// Fields whose non-entity values are kept as literal properties
pub const LITERAL_RULES: &[FieldRule] = &[
    FieldRule::new("valor", "valorLabel"),
    FieldRule::new("o", "ol_"),
];

/// A literal-valued object, recorded as a property instead of an edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralValue {
    pub value: String,
    pub value_label: String,
}

/// Canonical fields of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub subject: EntityId,
    pub subject_label: String,
    pub predicate_id: Option<PropertyId>,
    pub predicate_label: Option<String>,
    pub object: Option<EntityId>,
    pub object_label: String,
    pub literal: Option<LiteralValue>,
}

/// Ordered extraction strategies for every role
#[derive(Debug, Clone)]
pub struct Normalizer {
    subject: Vec<FieldRule>,
    subject_fallback: Vec<FieldRule>,
    object: Vec<FieldRule>,
    predicate: Vec<&'static str>,
    predicate_label: Vec<&'static str>,
    literal: Vec<FieldRule>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer {
            subject: SUBJECT_RULES.to_vec(),
            subject_fallback: SUBJECT_FALLBACK_RULES.to_vec(),
            object: OBJECT_RULES.to_vec(),
            predicate: PREDICATE_FIELDS.to_vec(),
            predicate_label: PREDICATE_LABEL_FIELDS.to_vec(),
            literal: LITERAL_RULES.to_vec(),
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subject rule at the lowest priority
    pub fn with_subject_rule(mut self, rule: FieldRule) -> Self {
        self.subject.push(rule);
        self
    }

    /// Resolve the subject id and label.
    ///
    /// The label is the first non-empty subject label field, independent of
    /// which field supplied the id. When only the fallback matches, the
    /// label comes from that field's companion and the field is reported so
    /// object resolution can skip it.
    pub fn subject<'r>(&self, record: &'r Record) -> Option<(EntityId, &'r str, Option<&'static str>)> {
        if let Some(id) = self.subject.iter().find_map(|rule| rule.entity(record)) {
            let label = first_non_empty(record, self.subject.iter().map(|r| r.label_field));
            return Some((id, label, None));
        }
        self.subject_fallback.iter().find_map(|rule| {
            rule.entity(record)
                .map(|id| (id, rule.label(record), Some(rule.field)))
        })
    }

    /// Resolve the predicate id and label
    pub fn predicate(&self, record: &Record) -> (Option<PropertyId>, Option<String>) {
        let id = self
            .predicate
            .iter()
            .find_map(|field| extract_pid(record.get_value(field)));
        let label = first_non_empty(record, self.predicate_label.iter().copied());
        let label = if label.is_empty() {
            id.as_ref().map(|pid| pid.as_str().to_string())
        } else {
            Some(label.to_string())
        };
        (id, label)
    }

    /// Resolve the object id, skipping the rule for field `skip` if given.
    /// The label is the first non-empty label field among the remaining
    /// rules, so a field consumed as subject never labels the object.
    pub fn object<'r>(&self, record: &'r Record, skip: Option<&str>) -> (Option<EntityId>, &'r str) {
        let rules = || self.object.iter().filter(move |rule| Some(rule.field) != skip);
        let id = rules().find_map(|rule| rule.entity(record));
        let label = first_non_empty(record, rules().map(|r| r.label_field));
        (id, label)
    }

    /// First literal (non-entity) object value
    pub fn literal(&self, record: &Record) -> Option<LiteralValue> {
        self.literal.iter().find_map(|rule| {
            let value = record.get_value(rule.field);
            if value.is_empty() || extract_qid(value).is_some() {
                return None;
            }
            let label = rule.label(record);
            Some(LiteralValue {
                value: value.to_string(),
                value_label: if label.is_empty() { value } else { label }.to_string(),
            })
        })
    }

    /// Normalize a record. `None` when no subject can be resolved.
    pub fn normalize(&self, record: &Record) -> Option<NormalizedRow> {
        let (subject, subject_label, consumed) = self.subject(record)?;
        let (predicate_id, predicate_label) = self.predicate(record);
        let (object, object_label) = self.object(record, consumed);
        let literal = if object.is_none() { self.literal(record) } else { None };

        Some(NormalizedRow {
            subject,
            subject_label: subject_label.to_string(),
            predicate_id,
            predicate_label,
            object,
            object_label: object_label.to_string(),
            literal,
        })
    }
}

fn first_non_empty<'r>(record: &'r Record, fields: impl IntoIterator<Item = &'static str>) -> &'r str {
    fields
        .into_iter()
        .map(|field| record.get_value(field))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BindingValue;

    fn uri(id: &str) -> BindingValue {
        BindingValue::Wrapped(format!("http://www.wikidata.org/entity/{}", id))
    }

    fn prop(id: &str) -> BindingValue {
        BindingValue::Wrapped(format!("http://www.wikidata.org/prop/direct/{}", id))
    }

    #[test]
    fn test_basic_triple() {
        let record = Record::new()
            .with("item", uri("Q1"))
            .with("itemLabel", "A".into())
            .with("propiedad", prop("P131"))
            .with("propiedadLabel", "ubicado en".into())
            .with("valor", uri("Q2"))
            .with("valorLabel", "B".into());

        let row = Normalizer::new().normalize(&record).unwrap();
        assert_eq!(row.subject.as_str(), "Q1");
        assert_eq!(row.subject_label, "A");
        assert_eq!(row.predicate_id, Some(PropertyId::new("P131")));
        assert_eq!(row.predicate_label.as_deref(), Some("ubicado en"));
        assert_eq!(row.object, Some(EntityId::new("Q2")));
        assert_eq!(row.object_label, "B");
        assert!(row.literal.is_none());
    }

    #[test]
    fn test_subject_priority_order() {
        let record = Record::new()
            .with("festividad", uri("Q3"))
            .with("item1", uri("Q2"))
            .with("festividadLabel", "F".into());

        let row = Normalizer::new().normalize(&record).unwrap();
        // item1 outranks festividad, but the label search is independent
        assert_eq!(row.subject.as_str(), "Q2");
        assert_eq!(row.subject_label, "F");
    }

    #[test]
    fn test_subject_fallback_from_object_field() {
        let record = Record::new()
            .with("entidadIntermedia", uri("Q9"))
            .with("entidadIntermediaLabel", "Cusco".into());

        let row = Normalizer::new().normalize(&record).unwrap();
        assert_eq!(row.subject.as_str(), "Q9");
        assert_eq!(row.subject_label, "Cusco");
        assert!(row.object.is_none());
    }

    #[test]
    fn test_fallback_subject_label_not_reused_for_object() {
        let record = Record::new()
            .with("item2", uri("Q10"))
            .with("item2Label", "Subject".into())
            .with("valor", uri("Q20"))
            .with("valorLabel", "Object".into());

        let row = Normalizer::new().normalize(&record).unwrap();
        assert_eq!(row.subject.as_str(), "Q10");
        assert_eq!(row.subject_label, "Subject");
        assert_eq!(row.object, Some(EntityId::new("Q20")));
        assert_eq!(row.object_label, "Object");
    }

    #[test]
    fn test_predicate_label_falls_back_to_id() {
        let record = Record::new()
            .with("subject", uri("Q1"))
            .with("p", prop("P17"))
            .with("o", uri("Q419"));

        let row = Normalizer::new().normalize(&record).unwrap();
        assert_eq!(row.predicate_label.as_deref(), Some("P17"));
        assert_eq!(row.object, Some(EntityId::new("Q419")));
    }

    #[test]
    fn test_literal_object() {
        let record = Record::new()
            .with("item", uri("Q1"))
            .with("propiedadLabel", "fecha".into())
            .with("valor", "1780-06-01".into());

        let row = Normalizer::new().normalize(&record).unwrap();
        assert!(row.object.is_none());
        let literal = row.literal.unwrap();
        assert_eq!(literal.value, "1780-06-01");
        assert_eq!(literal.value_label, "1780-06-01");
    }

    #[test]
    fn test_unresolvable_subject() {
        let record = Record::new()
            .with("itemLabel", "only a label".into())
            .with("item", "not-a-uri".into());
        assert!(Normalizer::new().normalize(&record).is_none());
        assert!(Normalizer::new().normalize(&Record::new()).is_none());
    }

    #[test]
    fn test_custom_rule_appended_last() {
        let normalizer = Normalizer::new().with_subject_rule(FieldRule::new("fiesta", "fiestaLabel"));
        let record = Record::new().with("fiesta", uri("Q5"));
        assert_eq!(normalizer.normalize(&record).unwrap().subject.as_str(), "Q5");
    }
}
