//! Domain-indexed collection of compiled patterns (spec §4.2).

use std::collections::HashMap;

use cabin_nlu_vocabulary::VocabularyManager;

use crate::document::DomainRuleFile;
use crate::error::MatcherError;
use crate::pattern::CompiledPattern;

/// Pseudo-domain for rule files meant to be checked regardless of the
/// caller-supplied domain (the "global regex path", spec §4.5).
pub const GLOBAL_DOMAIN: &str = "__global__";

pub struct RuleSet {
    domains: HashMap<String, Vec<CompiledPattern>>,
}

impl RuleSet {
    pub fn build(files: &[DomainRuleFile], vocab: &VocabularyManager) -> Result<Self, MatcherError> {
        let mut domains: HashMap<String, Vec<CompiledPattern>> = HashMap::new();

        for file in files {
            let mut compiled = Vec::with_capacity(file.patterns.len());
            for doc in &file.patterns {
                compiled.push(CompiledPattern::compile(&file.domain, doc, vocab)?);
            }
            domains.entry(file.domain.clone()).or_default().extend(compiled);
        }

        Ok(Self { domains })
    }

    pub fn patterns_for(&self, domain: &str) -> Option<&[CompiledPattern]> {
        self.domains.get(domain).map(|v| v.as_slice())
    }

    /// Every domain name known to this rule set, sorted for deterministic
    /// iteration. `GLOBAL_DOMAIN`'s leading underscores place it first
    /// among any Chinese domain names without special-casing.
    pub fn sorted_domain_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.domains.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PatternDoc;
    use std::collections::HashMap as StdHashMap;

    fn vocab() -> VocabularyManager {
        let mut groups = StdHashMap::new();
        groups.insert(
            "action_open".to_string(),
            cabin_nlu_vocabulary::VocabularyGroup::new("action_open", vec!["打开".to_string()], "open"),
        );
        VocabularyManager::from_groups(groups)
    }

    fn pattern_doc() -> PatternDoc {
        PatternDoc {
            pattern: "{{action_open}}".to_string(),
            intent: "vehicle_control".to_string(),
            action: None,
            target: None,
            confidence: 0.9,
            domain: None,
            group_names: None,
        }
    }

    #[test]
    fn global_domain_sorts_before_chinese_domains() {
        let files = vec![
            DomainRuleFile {
                domain: "车控".to_string(),
                description: String::new(),
                patterns: vec![pattern_doc()],
            },
            DomainRuleFile {
                domain: GLOBAL_DOMAIN.to_string(),
                description: String::new(),
                patterns: vec![pattern_doc()],
            },
        ];
        let rules = RuleSet::build(&files, &vocab()).unwrap();
        let names = rules.sorted_domain_names();
        assert_eq!(names[0], GLOBAL_DOMAIN);
    }

    #[test]
    fn patterns_accumulate_across_files_sharing_a_domain() {
        let files = vec![
            DomainRuleFile {
                domain: "车控".to_string(),
                description: String::new(),
                patterns: vec![pattern_doc()],
            },
            DomainRuleFile {
                domain: "车控".to_string(),
                description: String::new(),
                patterns: vec![pattern_doc()],
            },
        ];
        let rules = RuleSet::build(&files, &vocab()).unwrap();
        assert_eq!(rules.patterns_for("车控").unwrap().len(), 2);
    }
}
