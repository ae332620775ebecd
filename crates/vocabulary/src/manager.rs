//! Compiles vocabulary groups into regex alternations and serves as the
//! canonical Chinese surface-string → alias dictionary (spec §4.1).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::VocabularyError;
use crate::group::{VocabularyDocument, VocabularyGroup};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Immutable, thread-safe lookup structures built once at load time.
pub struct VocabularyManager {
    groups: HashMap<String, VocabularyGroup>,
    /// surface string -> (alias, owning group id), precomputed per the
    /// "more specific group wins" tie-break (spec §3, §9).
    alias_index: HashMap<String, (String, String)>,
}

impl VocabularyManager {
    /// Build from the parsed wire document.
    pub fn from_document(doc: VocabularyDocument) -> Self {
        let groups = doc
            .groups
            .into_iter()
            .map(|(id, g)| {
                (
                    id.clone(),
                    VocabularyGroup::new(id, g.items, g.alias),
                )
            })
            .collect();
        Self::from_groups(groups)
    }

    /// Build directly from already-constructed groups (handy for tests and
    /// for callers assembling vocabulary programmatically).
    pub fn from_groups(groups: HashMap<String, VocabularyGroup>) -> Self {
        let alias_index = Self::build_alias_index(&groups);
        Self { groups, alias_index }
    }

    fn build_alias_index(groups: &HashMap<String, VocabularyGroup>) -> HashMap<String, (String, String)> {
        let mut index: HashMap<String, (String, String, usize)> = HashMap::new();

        let mut ids: Vec<&String> = groups.keys().collect();
        ids.sort(); // deterministic base order over an otherwise-unordered map

        for id in ids {
            let group = &groups[id];
            let item_count = group.items.len();
            for item in &group.items {
                let candidate = (group.alias.clone(), group.id.clone(), item_count);
                match index.get(item) {
                    None => {
                        index.insert(item.clone(), candidate);
                    }
                    Some((_, _, existing_count)) => {
                        // Smaller items list wins (higher specificity). On an
                        // exact tie the later group in sorted-id order wins,
                        // giving a deterministic "later declaration" reading.
                        if item_count <= *existing_count {
                            index.insert(item.clone(), candidate);
                        }
                    }
                }
            }
        }

        index
            .into_iter()
            .map(|(surface, (alias, group_id, _))| (surface, (alias, group_id)))
            .collect()
    }

    /// Replace every `{{id}}` in `template` with `(item1|item2|...)`, items
    /// regex-escaped and ordered by descending grapheme length so that a
    /// longer alternative is never shadowed by a shorter prefix.
    pub fn expand(&self, template: &str) -> Result<String, VocabularyError> {
        let mut output = String::with_capacity(template.len());
        let mut last_end = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let whole = caps.get(0).unwrap();
            let id = &caps[1];
            output.push_str(&template[last_end..whole.start()]);
            output.push_str(&self.expand_group(id)?);
            last_end = whole.end();
        }
        output.push_str(&template[last_end..]);

        if output.contains("{{") {
            return Err(VocabularyError::UnterminatedPlaceholder);
        }

        Ok(output)
    }

    fn expand_group(&self, id: &str) -> Result<String, VocabularyError> {
        let group = self
            .groups
            .get(id)
            .ok_or_else(|| VocabularyError::UnknownVocabularyGroup(id.to_string()))?;

        if group.items.is_empty() {
            return Err(VocabularyError::EmptyGroup(id.to_string()));
        }

        let mut items: Vec<&str> = group.items.iter().map(|s| s.as_str()).collect();
        items.sort_by_key(|s| std::cmp::Reverse(grapheme_len(s)));

        let escaped: Vec<String> = items.iter().map(|s| regex::escape(s)).collect();
        Ok(format!("({})", escaped.join("|")))
    }

    /// Reverse lookup: canonical alias and owning group id for a surface
    /// string, or `None` if it belongs to no known group.
    pub fn alias_of(&self, surface: &str) -> Option<(&str, &str)> {
        self.alias_index
            .get(surface)
            .map(|(alias, group_id)| (alias.as_str(), group_id.as_str()))
    }

    /// Slot-typed groups (`action_*`, `target_*`, `position_*`, `value_*`)
    /// relevant to a domain. Purely informational — the vocabulary data
    /// model carries no per-domain tagging, so every caller currently sees
    /// the same slot-typed groups regardless of `domain`.
    pub fn groups_for_domain(&self, _domain: &str) -> Vec<&VocabularyGroup> {
        self.groups
            .values()
            .filter(|g| cabin_nlu_core::SLOT_NAMES.iter().any(|slot| g.id.starts_with(&format!("{slot}_"))))
            .collect()
    }

    /// All slot-typed groups, used by the intent matcher's free-text scan
    /// (spec §4.4) regardless of domain.
    pub fn slot_groups(&self) -> Vec<&VocabularyGroup> {
        self.groups_for_domain("")
    }

    pub fn group(&self, id: &str) -> Option<&VocabularyGroup> {
        self.groups.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{VocabularyGroupDoc, VocabularyDocument};

    fn sample_document() -> VocabularyDocument {
        let mut groups = HashMap::new();
        groups.insert(
            "action_open".to_string(),
            VocabularyGroupDoc {
                name: "open".to_string(),
                description: "".to_string(),
                items: vec!["打开".to_string(), "开启".to_string(), "开".to_string()],
                alias: "open".to_string(),
            },
        );
        groups.insert(
            "target_window".to_string(),
            VocabularyGroupDoc {
                name: "window".to_string(),
                description: "".to_string(),
                items: vec!["车窗".to_string(), "窗户".to_string()],
                alias: "window".to_string(),
            },
        );
        groups.insert(
            "position_driver".to_string(),
            VocabularyGroupDoc {
                name: "driver".to_string(),
                description: "".to_string(),
                items: vec!["主驾驶".to_string(), "主驾".to_string(), "驾驶位".to_string()],
                alias: "driver".to_string(),
            },
        );
        VocabularyDocument { groups }
    }

    #[test]
    fn expand_orders_alternatives_longest_first() {
        let manager = VocabularyManager::from_document(sample_document());
        let expanded = manager.expand("{{position_driver}}").unwrap();
        // "主驾驶" (3 graphemes) must precede "主驾" (2) which must precede
        // nothing shorter exists here, but also must precede "驾驶位" correctly
        // ordered amongst equal-length items by their declared order.
        let open_paren = expanded.find('(').unwrap();
        let pos_of = |needle: &str| expanded[open_paren..].find(needle).unwrap();
        assert!(pos_of("主驾驶") < pos_of("主驾"));
    }

    #[test]
    fn expand_unknown_group_fails() {
        let manager = VocabularyManager::from_document(sample_document());
        let err = manager.expand("{{nonexistent}}").unwrap_err();
        assert!(matches!(err, VocabularyError::UnknownVocabularyGroup(id) if id == "nonexistent"));
    }

    #[test]
    fn expand_leaves_no_residual_placeholder() {
        let manager = VocabularyManager::from_document(sample_document());
        let expanded = manager
            .expand("(?P<action>{{action_open}})(?P<target>{{target_window}})")
            .unwrap();
        assert!(!expanded.contains("{{"));
        assert!(!expanded.contains("}}"));
    }

    #[test]
    fn alias_of_round_trips_every_item() {
        let manager = VocabularyManager::from_document(sample_document());
        assert_eq!(manager.alias_of("打开"), Some(("open", "action_open")));
        assert_eq!(manager.alias_of("主驾"), Some(("driver", "position_driver")));
        assert_eq!(manager.alias_of("不存在"), None);
    }

    #[test]
    fn more_specific_group_wins_reverse_lookup() {
        let mut groups = HashMap::new();
        groups.insert(
            "broad".to_string(),
            VocabularyGroup::new("broad", vec!["车窗".to_string(), "门".to_string(), "灯".to_string()], "broad_alias"),
        );
        groups.insert(
            "narrow".to_string(),
            VocabularyGroup::new("narrow", vec!["车窗".to_string()], "narrow_alias"),
        );
        let manager = VocabularyManager::from_groups(groups);
        // "narrow" has fewer items (1 < 3) so it is the more specific group.
        assert_eq!(manager.alias_of("车窗"), Some(("narrow_alias", "narrow")));
    }

    #[test]
    fn groups_for_domain_returns_slot_typed_groups_only() {
        let manager = VocabularyManager::from_document(sample_document());
        let groups = manager.groups_for_domain("车控");
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| {
            cabin_nlu_core::SLOT_NAMES.iter().any(|s| g.id.starts_with(&format!("{s}_")))
        }));
    }
}
