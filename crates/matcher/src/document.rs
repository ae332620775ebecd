//! Domain rule file wire format (spec §6.3).

use serde::{Deserialize, Serialize};

/// One file per domain: `{"domain": str, "description": str, "patterns": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRuleFile {
    pub domain: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub patterns: Vec<PatternDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDoc {
    /// May contain `{{group_id}}` placeholders, expanded at load time.
    pub pattern: String,
    pub intent: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    pub confidence: f32,
    /// Overrides the enclosing file's domain when present (spec §4.2 edge case).
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub group_names: Option<Vec<String>>,
}
