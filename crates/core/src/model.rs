//! Shared data model: the recognition result and its slot/semantic types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fallback domain used when no path produces a confident result.
pub const FALLBACK_DOMAIN: &str = "通用";

/// Fallback/sentinel intent for an unrecognized utterance.
pub const FALLBACK_INTENT: &str = "unknown";

/// Default gate for the regex paths (`regex_global`, `regex_domain`).
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Default gate for the embedding paths (domain classification, intent match).
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.6;

/// The four recognized semantic slot positions.
pub const SLOT_NAMES: [&str; 4] = ["action", "target", "position", "value"];

/// Which path produced a recognition result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    RegexGlobal,
    RegexDomain,
    Model,
    None,
}

impl Method {
    /// Precedence used to break simultaneous-completion ties in the race:
    /// `regex_global > regex_domain > model`. Lower is higher priority.
    pub fn precedence(self) -> u8 {
        match self {
            Method::RegexGlobal => 0,
            Method::RegexDomain => 1,
            Method::Model => 2,
            Method::None => 3,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Method::RegexGlobal => "regex_global",
            Method::RegexDomain => "regex_domain",
            Method::Model => "model",
            Method::None => "none",
        };
        write!(f, "{s}")
    }
}

/// The slot assignments extracted for an utterance, keyed by alias.
///
/// Keys with nil/empty values MUST be omitted from serialized output; this
/// type enforces that by construction rather than by a serde attribute, so
/// that `semantic.is_empty()` and iteration also see the same invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Semantic(BTreeMap<String, String>);

impl Semantic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a slot value. A nil/empty value is a no-op, preserving the
    /// "never a nil-valued key" invariant.
    pub fn insert(&mut self, slot: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.0.insert(slot.into(), value);
        }
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0.get(slot).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Raw Chinese surface strings keyed by slot name, as distinct from the
/// alias values carried in `Semantic`.
pub type Entities = BTreeMap<String, String>;

/// The structured semantic frame produced by `recognize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentData {
    pub intent: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Semantic::is_empty", default)]
    pub semantic: Semantic,
    pub confidence: f32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub entities: Entities,
    pub raw_text: String,
    pub method: Method,
}

impl IntentData {
    /// The canonical "no acceptable result" response (spec §3, §4.5, §7).
    pub fn none(raw_text: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            intent: FALLBACK_INTENT.to_string(),
            domain: domain.into(),
            semantic: Semantic::new(),
            confidence: 0.0,
            entities: Entities::new(),
            raw_text: raw_text.into(),
            method: Method::None,
        }
    }

    /// `true` iff this result satisfies the universal well-formedness
    /// invariants from spec §8 (properties 1-3).
    pub fn is_well_formed(&self) -> bool {
        if self.method == Method::None {
            return self.intent == FALLBACK_INTENT && self.confidence == 0.0;
        }
        !self.semantic.iter().any(|(_, v)| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_result_is_well_formed() {
        let result = IntentData::none("今天天气如何", FALLBACK_DOMAIN);
        assert!(result.is_well_formed());
        assert_eq!(result.intent, "unknown");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method, Method::None);
    }

    #[test]
    fn semantic_drops_empty_values() {
        let mut semantic = Semantic::new();
        semantic.insert("action", "");
        semantic.insert("target", "window");
        assert_eq!(semantic.get("action"), None);
        assert_eq!(semantic.get("target"), Some("window"));
    }

    #[test]
    fn serialization_omits_empty_semantic_and_entities() {
        let result = IntentData::none("", FALLBACK_DOMAIN);
        let json = serde_json::to_value(&result).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("semantic"));
        assert!(!obj.contains_key("entities"));
    }

    #[test]
    fn method_precedence_orders_regex_global_first() {
        assert!(Method::RegexGlobal.precedence() < Method::RegexDomain.precedence());
        assert!(Method::RegexDomain.precedence() < Method::Model.precedence());
        assert!(Method::Model.precedence() < Method::None.precedence());
    }

    #[test]
    fn method_serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&Method::RegexGlobal).unwrap(), "\"regex_global\"");
        assert_eq!(serde_json::to_string(&Method::Model).unwrap(), "\"model\"");
    }
}
