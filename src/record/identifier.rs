//! Identifier extraction
//!
//! Pulls canonical entity/property ids out of URI-shaped strings. A string
//! that does not end in `/entity/Q<n>` or `/prop/direct/P<n>` has no
//! identifier; that is the common case, not an error.

use crate::graph::{EntityId, PropertyId};
use regex::Regex;
use std::sync::OnceLock;

/// Which kind of identifier to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// `…/entity/Q123`
    Entity,
    /// `…/prop/direct/P123`
    Property,
}

fn entity_uri() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/entity/(Q\d+)$").expect("valid entity regex"))
}

fn property_uri() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/prop/direct/(P\d+)$").expect("valid property regex"))
}

fn bare_entity() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Q\d+$").expect("valid bare entity regex"))
}

fn bare_property() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^P\d+$").expect("valid bare property regex"))
}

/// Captured identifier of `kind` at the end of `text`, if any
pub fn extract_identifier(text: &str, kind: IdentifierKind) -> Option<&str> {
    let re = match kind {
        IdentifierKind::Entity => entity_uri(),
        IdentifierKind::Property => property_uri(),
    };
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Entity id from an entity URI
pub fn extract_qid(text: &str) -> Option<EntityId> {
    extract_identifier(text, IdentifierKind::Entity).map(EntityId::from)
}

/// Property id from a direct-property URI
pub fn extract_pid(text: &str) -> Option<PropertyId> {
    extract_identifier(text, IdentifierKind::Property).map(PropertyId::from)
}

/// Entity id from either a full URI or a bare `Q<n>` id
pub fn parse_entity(text: &str) -> Option<EntityId> {
    let text = text.trim();
    if bare_entity().is_match(text) {
        return Some(EntityId::new(text));
    }
    extract_qid(text)
}

/// Property id from a direct-property URI or a bare `P<n>` id
pub fn parse_property(text: &str) -> Option<PropertyId> {
    let text = text.trim();
    if bare_property().is_match(text) {
        return Some(PropertyId::new(text));
    }
    extract_pid(text)
}

/// Last path segment of a URI, as the result scripts used for short ids
pub fn last_segment(text: &str) -> &str {
    text.rsplit('/').next().unwrap_or(text)
}
