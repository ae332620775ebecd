//! A compiled regex rule: expanded pattern, declared intent/defaults, and
//! the domain it resolves to (spec §3 "Compiled pattern").

use regex::Regex;

use cabin_nlu_vocabulary::VocabularyManager;

use crate::document::PatternDoc;
use crate::error::MatcherError;

pub struct CompiledPattern {
    pub source_template: String,
    pub expanded: String,
    pub regex: Regex,
    pub intent: String,
    pub default_action: Option<String>,
    pub default_target: Option<String>,
    pub confidence: f32,
    /// The `domain` field declared on the pattern itself, if any.
    pub declared_domain: Option<String>,
    /// The domain of the file this pattern was loaded from.
    pub file_domain: String,
}

impl CompiledPattern {
    pub fn compile(
        file_domain: &str,
        doc: &PatternDoc,
        vocab: &VocabularyManager,
    ) -> Result<Self, MatcherError> {
        let expanded = vocab
            .expand(&doc.pattern)
            .map_err(|e| MatcherError::Vocabulary(e.to_string()))?;

        let regex = Regex::new(&expanded).map_err(|e| MatcherError::InvalidRegex {
            pattern: expanded.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source_template: doc.pattern.clone(),
            expanded,
            regex,
            intent: doc.intent.clone(),
            default_action: doc.action.clone(),
            default_target: doc.target.clone(),
            confidence: doc.confidence,
            declared_domain: doc.domain.clone(),
            file_domain: file_domain.to_string(),
        })
    }

    /// The domain a hit on this pattern should be reported under: the
    /// pattern's own declared domain wins over the file's domain.
    pub fn resolved_domain(&self) -> String {
        self.declared_domain
            .clone()
            .unwrap_or_else(|| self.file_domain.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vocab() -> VocabularyManager {
        let mut groups = HashMap::new();
        groups.insert(
            "action_open".to_string(),
            cabin_nlu_vocabulary::VocabularyGroup::new(
                "action_open",
                vec!["打开".to_string()],
                "open",
            ),
        );
        VocabularyManager::from_groups(groups)
    }

    #[test]
    fn declared_domain_overrides_file_domain() {
        let doc = PatternDoc {
            pattern: "{{action_open}}".to_string(),
            intent: "vehicle_control".to_string(),
            action: None,
            target: None,
            confidence: 0.9,
            domain: Some("车控".to_string()),
            group_names: None,
        };
        let compiled = CompiledPattern::compile("__global__", &doc, &vocab()).unwrap();
        assert_eq!(compiled.resolved_domain(), "车控");
    }

    #[test]
    fn falls_back_to_file_domain_when_undeclared() {
        let doc = PatternDoc {
            pattern: "{{action_open}}".to_string(),
            intent: "vehicle_control".to_string(),
            action: None,
            target: None,
            confidence: 0.9,
            domain: None,
            group_names: None,
        };
        let compiled = CompiledPattern::compile("车控", &doc, &vocab()).unwrap();
        assert_eq!(compiled.resolved_domain(), "车控");
    }

    #[test]
    fn unknown_group_reference_fails_compilation() {
        let doc = PatternDoc {
            pattern: "{{nonexistent}}".to_string(),
            intent: "x".to_string(),
            action: None,
            target: None,
            confidence: 0.5,
            domain: None,
            group_names: None,
        };
        assert!(CompiledPattern::compile("车控", &doc, &vocab()).is_err());
    }
}
