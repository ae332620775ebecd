//! The vocabulary document wire format (spec §6.3) and the compiled
//! in-memory group it loads into.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `{"groups": {"<id>": {"name": str, "description": str, "items": [...], "alias": str}}}`.
/// Unknown keys at any level are ignored by `serde`'s default behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyDocument {
    #[serde(default)]
    pub groups: HashMap<String, VocabularyGroupDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyGroupDoc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub items: Vec<String>,
    pub alias: String,
}

/// A compiled vocabulary group: an id, its ordered surface-string items, and
/// the single canonical alias emitted in structured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyGroup {
    pub id: String,
    pub items: Vec<String>,
    pub alias: String,
}

impl VocabularyGroup {
    pub fn new(id: impl Into<String>, items: Vec<String>, alias: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items,
            alias: alias.into(),
        }
    }
}
