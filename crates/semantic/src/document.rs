//! Domain/intent example-set wire formats (spec §6.3).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `{"<domain>": [str,...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainExamplesFile(pub HashMap<String, Vec<String>>);

/// `{"intent_examples": {"<intent>": {"description": str, "examples": [str,...], "domain": str}}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentExamplesFile {
    #[serde(default)]
    pub intent_examples: HashMap<String, IntentExampleDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentExampleDoc {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    pub domain: String,
}
