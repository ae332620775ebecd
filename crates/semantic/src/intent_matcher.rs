//! Within a chosen domain, picks the best intent label by embedding
//! similarity and independently scans for slot-typed vocabulary hits
//! (spec §4.4).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use unicode_segmentation::UnicodeSegmentation;

use cabin_nlu_core::model::{Entities, Semantic, SLOT_NAMES};
use cabin_nlu_core::EmbeddingProvider;
use cabin_nlu_vocabulary::VocabularyManager;

use crate::document::IntentExamplesFile;
use crate::error::SemanticError;
use crate::vector::{centroid, cosine_similarity, unit_normalize};

#[derive(Debug, Clone, PartialEq)]
pub struct IntentPrediction {
    pub intent: String,
    pub confidence: f32,
    pub semantic: Semantic,
    pub entities: Entities,
}

struct IntentCentroid {
    domain: String,
    intent: String,
    centroid: Vec<f32>,
}

pub struct IntentMatcher {
    provider: Arc<dyn EmbeddingProvider>,
    vocab: Arc<VocabularyManager>,
    centroids: Vec<IntentCentroid>,
    similarity_threshold: f32,
    fallback_intent: String,
    cache_capacity: usize,
    cache: Mutex<HashMap<(String, String), IntentPrediction>>,
}

impl IntentMatcher {
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        vocab: Arc<VocabularyManager>,
        examples: &IntentExamplesFile,
        similarity_threshold: f32,
        fallback_intent: impl Into<String>,
        cache_capacity: usize,
    ) -> Result<Self, SemanticError> {
        let mut centroids = Vec::new();

        for (intent, doc) in &examples.intent_examples {
            if doc.examples.is_empty() {
                return Err(SemanticError::EmptyIntent(intent.clone()));
            }
            let mut vectors = Vec::with_capacity(doc.examples.len());
            for utterance in &doc.examples {
                let embedding = provider
                    .embed(utterance)
                    .await
                    .map_err(|e| SemanticError::Embedding(e.to_string()))?;
                vectors.push(embedding);
            }
            centroids.push(IntentCentroid {
                domain: doc.domain.clone(),
                intent: intent.clone(),
                centroid: centroid(&vectors),
            });
        }

        Ok(Self {
            provider,
            vocab,
            centroids,
            similarity_threshold,
            fallback_intent: fallback_intent.into(),
            cache_capacity,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub async fn predict(&self, text: &str, domain: &str) -> Result<IntentPrediction, SemanticError> {
        let key = (text.to_string(), domain.to_string());
        if let Some(hit) = self.cache.lock().get(&key).cloned() {
            tracing::debug!(%domain, "intent matcher cache hit");
            return Ok(hit);
        }
        tracing::debug!(%text, %domain, "intent matcher cache miss, embedding utterance");

        let embedding = self
            .provider
            .embed(text)
            .await
            .map_err(|e| SemanticError::Embedding(e.to_string()))?;
        let normalized = unit_normalize(&embedding);

        let mut candidates: Vec<&IntentCentroid> =
            self.centroids.iter().filter(|c| c.domain == domain).collect();
        candidates.sort_by(|a, b| a.intent.cmp(&b.intent));

        let mut best: Option<(&str, f32)> = None;
        for candidate in &candidates {
            let sim = cosine_similarity(&normalized, &candidate.centroid);
            best = match best {
                None => Some((candidate.intent.as_str(), sim)),
                Some((_, best_sim)) if sim > best_sim => Some((candidate.intent.as_str(), sim)),
                other => other,
            };
        }

        let (semantic, entities) = self.extract_slots(text);

        let prediction = match best {
            Some((intent, sim)) if sim >= self.similarity_threshold => IntentPrediction {
                intent: intent.to_string(),
                confidence: sim,
                semantic,
                entities,
            },
            Some((_, sim)) => IntentPrediction {
                intent: self.fallback_intent.clone(),
                confidence: sim,
                semantic,
                entities,
            },
            None => IntentPrediction {
                intent: self.fallback_intent.clone(),
                confidence: 0.0,
                semantic,
                entities,
            },
        };

        let mut cache = self.cache.lock();
        if cache.len() >= self.cache_capacity {
            tracing::debug!("intent matcher cache full, clearing before insert");
            cache.clear();
        }
        cache.insert(key, prediction.clone());

        Ok(prediction)
    }

    /// Scans `text` for the longest non-overlapping match of any slot-typed
    /// vocabulary item, independently of the chosen intent. A strictly
    /// longer candidate (by grapheme count) always displaces the current
    /// best regardless of where it starts; among equal-length candidates
    /// the earlier-starting one wins.
    fn extract_slots(&self, text: &str) -> (Semantic, Entities) {
        let mut semantic = Semantic::new();
        let mut entities = Entities::new();

        for slot in SLOT_NAMES {
            let prefix = format!("{slot}_");
            let mut best: Option<(usize, usize, &str, &str)> = None;

            for group in self.vocab.slot_groups() {
                if !group.id.starts_with(&prefix) {
                    continue;
                }
                for item in &group.items {
                    if let Some(start) = text.find(item.as_str()) {
                        let len = item.graphemes(true).count();
                        best = match best {
                            None => Some((start, len, item.as_str(), group.alias.as_str())),
                            Some((b_start, b_len, _, _)) => {
                                if len > b_len || (len == b_len && start < b_start) {
                                    Some((start, len, item.as_str(), group.alias.as_str()))
                                } else {
                                    best
                                }
                            }
                        };
                    }
                }
            }

            if let Some((_, _, surface, alias)) = best {
                semantic.insert(slot, alias);
                entities.insert(slot.to_string(), surface.to_string());
            }
        }

        (semantic, entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_nlu_embeddings::HashEmbedder;
    use crate::document::IntentExampleDoc;
    use std::collections::HashMap as StdHashMap;

    fn vocab() -> Arc<VocabularyManager> {
        let mut groups = StdHashMap::new();
        groups.insert(
            "action_play".to_string(),
            cabin_nlu_vocabulary::VocabularyGroup::new("action_play", vec!["听".to_string(), "播放".to_string()], "play"),
        );
        Arc::new(VocabularyManager::from_groups(groups))
    }

    fn examples() -> IntentExamplesFile {
        let mut intent_examples = StdHashMap::new();
        intent_examples.insert(
            "music.play".to_string(),
            IntentExampleDoc {
                description: String::new(),
                examples: vec!["我想听周杰伦的歌".to_string(), "播放一首歌".to_string()],
                domain: "音乐".to_string(),
            },
        );
        IntentExamplesFile { intent_examples }
    }

    #[tokio::test]
    async fn predict_picks_the_nearest_intent_within_the_domain() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let matcher = IntentMatcher::build(provider, vocab(), &examples(), 0.0, "unknown", 16)
            .await
            .unwrap();
        let prediction = matcher.predict("我想听周杰伦的歌", "音乐").await.unwrap();
        assert_eq!(prediction.intent, "music.play");
    }

    #[tokio::test]
    async fn predict_falls_back_below_threshold() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let matcher = IntentMatcher::build(provider, vocab(), &examples(), 1.1, "unknown", 16)
            .await
            .unwrap();
        let prediction = matcher.predict("我想听周杰伦的歌", "音乐").await.unwrap();
        assert_eq!(prediction.intent, "unknown");
    }

    #[tokio::test]
    async fn no_candidates_outside_domain_falls_back() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let matcher = IntentMatcher::build(provider, vocab(), &examples(), 0.0, "unknown", 16)
            .await
            .unwrap();
        let prediction = matcher.predict("我想听周杰伦的歌", "车控").await.unwrap();
        assert_eq!(prediction.intent, "unknown");
    }

    #[tokio::test]
    async fn a_later_strictly_longer_match_displaces_an_earlier_shorter_one() {
        let mut groups = StdHashMap::new();
        groups.insert(
            "target_area".to_string(),
            cabin_nlu_vocabulary::VocabularyGroup::new(
                "target_area",
                vec!["窗".to_string(), "车窗玻璃".to_string()],
                "glass_area",
            ),
        );
        let vocab = Arc::new(VocabularyManager::from_groups(groups));

        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let matcher = IntentMatcher::build(provider, vocab, &examples(), 0.0, "unknown", 16)
            .await
            .unwrap();

        // "窗" (1 grapheme) matches at the very start; "车窗玻璃" (4 graphemes)
        // starts later but is strictly longer, so it must win despite not
        // being the leftmost candidate.
        let prediction = matcher.predict("窗打开车窗玻璃", "音乐").await.unwrap();
        assert_eq!(prediction.semantic.get("target"), Some("glass_area"));
        assert_eq!(prediction.entities.get("target").map(|s| s.as_str()), Some("车窗玻璃"));
    }

    #[tokio::test]
    async fn slot_extraction_prefers_the_longer_match() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let matcher = IntentMatcher::build(provider, vocab(), &examples(), 0.0, "unknown", 16)
            .await
            .unwrap();
        let prediction = matcher.predict("播放一首歌", "音乐").await.unwrap();
        assert_eq!(prediction.semantic.get("action"), Some("play"));
        assert_eq!(prediction.entities.get("action").map(|s| s.as_str()), Some("播放"));
    }
}
