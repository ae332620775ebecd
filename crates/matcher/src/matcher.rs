//! Matches an utterance against a `RuleSet` and extracts slot values
//! (spec §4.2: "Regex matching and slot extraction").

use std::sync::Arc;

use cabin_nlu_core::model::{Entities, Semantic, SLOT_NAMES};
use cabin_nlu_vocabulary::VocabularyManager;

use crate::pattern::CompiledPattern;
use crate::rules::{RuleSet, GLOBAL_DOMAIN};

/// The outcome of a successful regex hit, before it is folded into an
/// `IntentData` by the caller (who also knows which `Method` produced it).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub intent: String,
    pub domain: String,
    pub semantic: Semantic,
    pub entities: Entities,
    pub confidence: f32,
}

pub struct RegexMatcher {
    rules: RuleSet,
    vocab: Arc<VocabularyManager>,
}

impl RegexMatcher {
    pub fn new(rules: RuleSet, vocab: Arc<VocabularyManager>) -> Self {
        Self { rules, vocab }
    }

    /// Matches `text` against a single domain's patterns, or (when `domain`
    /// is `None`) against every known domain in deterministic order,
    /// returning the first hit in declaration/iteration order (spec §4.2,
    /// §5 "first match wins").
    pub fn match_text(&self, text: &str, domain: Option<&str>) -> Option<MatchOutcome> {
        match domain {
            Some(d) => {
                let patterns = self.rules.patterns_for(d)?;
                let outcome = self.first_hit(text, patterns);
                match &outcome {
                    Some(o) => tracing::debug!(domain = d, intent = %o.intent, "regex match found"),
                    None => tracing::debug!(domain = d, "no pattern matched in domain"),
                }
                outcome
            }
            None => {
                for name in self.rules.sorted_domain_names() {
                    if let Some(patterns) = self.rules.patterns_for(name) {
                        if let Some(outcome) = self.first_hit(text, patterns) {
                            tracing::debug!(domain = name, intent = %outcome.intent, "regex match found");
                            return Some(outcome);
                        }
                    }
                }
                tracing::debug!("no pattern matched in any domain");
                None
            }
        }
    }

    /// Convenience entry point for the orchestrator's global-regex path:
    /// always scans every domain, including `GLOBAL_DOMAIN` itself.
    pub fn match_global(&self, text: &str) -> Option<MatchOutcome> {
        self.match_text(text, None)
    }

    pub fn match_domain(&self, text: &str, domain: &str) -> Option<MatchOutcome> {
        if domain == GLOBAL_DOMAIN {
            return self.match_global(text);
        }
        self.match_text(text, Some(domain))
    }

    fn first_hit(&self, text: &str, patterns: &[CompiledPattern]) -> Option<MatchOutcome> {
        for pattern in patterns {
            if let Some(caps) = pattern.regex.captures(text) {
                let mut semantic = Semantic::new();
                let mut entities = Entities::new();

                for slot in SLOT_NAMES {
                    match caps.name(slot) {
                        Some(m) => {
                            let surface = m.as_str();
                            entities.insert(slot.to_string(), surface.to_string());
                            if let Some((alias, _group_id)) = self.vocab.alias_of(surface) {
                                semantic.insert(slot, alias);
                            }
                        }
                        None => {
                            let default = match slot {
                                "action" => pattern.default_action.as_deref(),
                                "target" => pattern.default_target.as_deref(),
                                _ => None,
                            };
                            if let Some(value) = default {
                                semantic.insert(slot, value);
                            }
                        }
                    }
                }

                return Some(MatchOutcome {
                    intent: pattern.intent.clone(),
                    domain: pattern.resolved_domain(),
                    semantic,
                    entities,
                    confidence: pattern.confidence,
                });
            }
        }
        None
    }
}
